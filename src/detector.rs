use std::path::Path;

use crate::parser::symbols::Framework;

/// Import signatures checked in priority order: react, then vue, then
/// svelte. A file importing from two frameworks resolves to whichever
/// check runs first.
const REACT_SIGNATURES: &[&str] = &["from 'react'", "from \"react\"", "require('react')", "require(\"react\")"];
const VUE_SIGNATURES: &[&str] = &["from 'vue'", "from \"vue\"", "require('vue')", "require(\"vue\")"];
const SVELTE_SIGNATURES: &[&str] = &["from 'svelte'", "from \"svelte\"", "from 'svelte/", "from \"svelte/"];

/// Classify a file's target framework from its text. Pure substring scan,
/// no AST; never fails.
pub fn detect_framework(source: &str, file_path: &Path) -> Framework {
    if REACT_SIGNATURES.iter().any(|sig| source.contains(sig)) {
        return Framework::React;
    }
    if VUE_SIGNATURES.iter().any(|sig| source.contains(sig)) {
        return Framework::Vue;
    }
    if SVELTE_SIGNATURES.iter().any(|sig| source.contains(sig)) {
        return Framework::Svelte;
    }
    match file_path.extension().and_then(|e| e.to_str()) {
        Some("svelte") => Framework::Svelte,
        Some("vue") => Framework::Vue,
        _ => Framework::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_react_from_import() {
        let src = "import React from 'react';\nexport const A = () => null;";
        assert_eq!(
            detect_framework(src, &PathBuf::from("A.tsx")),
            Framework::React
        );
    }

    #[test]
    fn detects_vue_and_svelte() {
        let vue = "import { defineComponent } from 'vue';";
        assert_eq!(
            detect_framework(vue, &PathBuf::from("App.js")),
            Framework::Vue
        );

        let svelte = "import { onMount } from 'svelte';";
        assert_eq!(
            detect_framework(svelte, &PathBuf::from("App.js")),
            Framework::Svelte
        );
    }

    #[test]
    fn svelte_extension_wins_without_imports() {
        assert_eq!(
            detect_framework("export let label;", &PathBuf::from("Button.svelte")),
            Framework::Svelte
        );
    }

    #[test]
    fn ambiguous_file_resolves_to_first_match() {
        let src = "import { h } from 'vue';\nimport React from 'react';";
        assert_eq!(
            detect_framework(src, &PathBuf::from("mixed.js")),
            Framework::React
        );
    }

    #[test]
    fn unknown_when_nothing_matches() {
        assert_eq!(
            detect_framework("const x = 1;", &PathBuf::from("util.ts")),
            Framework::Unknown
        );
    }
}
