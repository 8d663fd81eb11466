//! # Contract Name Scanner
//!
//! A deliberately narrow static scan for `contract <Name> { ... }`. This is
//! not a parser: it only needs to find the declared name so the artifact
//! path can be derived. A real parser can replace it behind
//! `ContractNameScanner` without touching the pipeline.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").expect("valid comment regex");
    static ref CONTRACT_DECL: Regex =
        Regex::new(r"\bcontract\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*(?:is\s[^{;]*)?\{")
            .expect("valid contract regex");
}

/// Extracts the declared contract name from source text.
pub trait ContractNameScanner: Send + Sync {
    /// Returns the name of the first contract declaration, if any.
    fn scan(&self, source: &str) -> Option<String>;
}

/// Regex-based scanner. Comments are stripped before scanning and the first
/// declaration wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexNameScanner;

impl ContractNameScanner for RegexNameScanner {
    fn scan(&self, source: &str) -> Option<String> {
        let code = COMMENT.replace_all(source, " ");
        CONTRACT_DECL
            .captures(&code)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}
