//! Score-based language detection.
//!
//! Grounded in `translator_engine.py::detect_language`: a fixed per-language
//! list of keyword/construct/idiom regexes, scored independently, with a
//! conservative decision rule for the single-match case.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// The supported candidate languages, in score-tie-break order.
pub const CANDIDATE_LANGUAGES: &[&str] = &[
    "Python",
    "JavaScript",
    "TypeScript",
    "Java",
    "Kotlin",
    "Swift",
    "C++",
    "Go",
    "Rust",
    "Ruby",
];

fn multiline(pattern: &str) -> Regex {
    RegexBuilder::new(pattern).multi_line(true).build().expect("static detector pattern is valid")
}

static PYTHON_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\s*def\s+\w+\s*\(",
        r"^\s*async\s+def\s+\w+\s*\(",
        r"^\s*class\s+\w+[\s(:]",
        r"^\s*import\s+\w+",
        r"^\s*from\s+\w+\s+import",
        r"\bprint\s*\(",
        r#"\bprint\s+["']"#,
        r#"if\s+__name__\s*==\s*["']__main__["']"#,
        r"^\s*elif\s+",
        r"^\s*except[\s:]",
        r#"[fF]["'][^"']*\{[^}]*\}"#,
        r"\[\s*\w+\s+for\s+\w+\s+in\s+",
        r"^\s*@\w+",
        r#"["']{3}"#,
    ]
    .iter()
    .map(|p| multiline(p))
    .collect()
});

static JAVASCRIPT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bfunction\s+\w+\s*\(",
        r"\bfunction\s*\(",
        r"=>\s*\{",
        r"=>\s*[^{]",
        r"\b(const|let|var)\s+\w+\s*=",
        r"\bconsole\.(log|error|warn|info)\s*\(",
        r"`[^`]*\$\{[^}]*\}",
        r"\bexport\s+(default\s+)?",
        r#"\bimport\s+.*\s+from\s+["']"#,
        r#"\brequire\s*\(["']"#,
        r"\.(map|filter|reduce|forEach)\s*\(",
        r"\basync\s+function",
        r"\bawait\s+",
        r"\btypeof\s+\w+",
    ]
    .iter()
    .map(|p| multiline(p))
    .collect()
});

static JAVA_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(public|private|protected)\s+(static\s+)?class\s+\w+",
        r"public\s+static\s+void\s+main\s*\(\s*String",
        r"^\s*import\s+(static\s+)?java\.",
        r"^\s*package\s+[\w.]+;",
        r"System\.(out|err)\.(print|println)\s*\(",
        r"^\s*@(Override|Deprecated|SuppressWarnings)",
        r"\b(extends|implements)\s+\w+",
        r"\bfinal\s+\w+",
        r"\bnew\s+\w+\s*\(",
        r"<[A-Z]\w*>",
        r"\b(try|catch|finally)\s*\{",
        r"\bthrows\s+\w+",
    ]
    .iter()
    .map(|p| multiline(p))
    .collect()
});

static CPP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"^\s*#include\s*[<"]"#,
        r"\busing\s+namespace\s+std\s*;",
        r"\bnamespace\s+\w+\s*\{",
        r"\bint\s+main\s*\(",
        r"\bstd::(cout|cin|endl|string|vector)",
        r"(cout|cerr)\s*<<",
        r"cin\s*>>",
        r"\bclass\s+\w+\s*[{:]",
        r"\btemplate\s*<",
        r"::\w+",
        r"\bvirtual\s+",
        r"\boperator\s*[+\-*/=<>]+\s*\(",
        r"\w+\s*\*\s*\w+",
        r"\w+\s*&\s*\w+",
    ]
    .iter()
    .map(|p| multiline(p))
    .collect()
});

static GO_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\s*package\s+\w+",
        r"^\s*import\s*\(",
        r#"^\s*import\s+""#,
        r"\bfunc\s+(\(\w+\s+\*?\w+\)\s+)?\w+\s*\(",
        r"\bfunc\s+main\s*\(\s*\)",
        r":=",
        r"\bfmt\.(Print|Printf|Println)\s*\(",
        r"\b(defer|go|chan|select)\s+",
        r"\bif\s+err\s*!=\s*nil\s*\{",
        r"\btype\s+\w+\s+struct\s*\{",
        r"\btype\s+\w+\s+interface\s*\{",
    ]
    .iter()
    .map(|p| multiline(p))
    .collect()
});

static RUST_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bfn\s+\w+\s*\(",
        r"\bfn\s+main\s*\(\s*\)",
        r"^\s*use\s+\w+(::\w+)*;",
        r"\b(println!|print!|eprintln!)\s*\(",
        r"\blet\s+(mut\s+)?\w+",
        r"\bmatch\s+\w+\s*\{",
        r"\bimpl\s+\w+",
        r"\bstruct\s+\w+",
        r"\benum\s+\w+",
        r"\btrait\s+\w+",
        r"&mut\s+",
        r"\bBox<",
        r"\bOption<",
        r"\bResult<",
        r"^\s*#\[derive",
    ]
    .iter()
    .map(|p| multiline(p))
    .collect()
});

static KOTLIN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bfun\s+\w+\s*\(",
        r"\bfun\s+main\s*\(",
        r"\b(val|var)\s+\w+\s*(:\s*\w+)?\s*=",
        r"\b(data\s+)?class\s+\w+",
        r"\bobject\s+\w+",
        r"\bwhen\s*\{",
        r"\bwhen\s*\([^)]+\)\s*\{",
        r"^\s*package\s+[\w.]+",
        r"^\s*import\s+[\w.]+",
        r"\bprintln\s*\(",
        r"\bprint\s*\(",
        r"\?\.",
        r"\?:",
        r"!!\.",
        r"\bsuspend\s+fun",
        r"\blaunch\s*\{",
        r"\basync\s*\{",
        r"\bfun\s+\w+\.\w+\s*\(",
    ]
    .iter()
    .map(|p| multiline(p))
    .collect()
});

static SWIFT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bfunc\s+\w+\s*\(",
        r"\b(let|var)\s+\w+\s*(:\s*\w+)?\s*=",
        r"\bclass\s+\w+",
        r"\bstruct\s+\w+",
        r"\benum\s+\w+",
        r"\bprotocol\s+\w+",
        r"\bguard\s+",
        r"\bif\s+let\s+",
        r"\bswitch\s+\w+\s*\{",
        r"^\s*import\s+(Foundation|UIKit|SwiftUI)",
        r"\bprint\s*\(",
        r"\?\?",
        r"\w+\?",
        r"\w+!",
        r"\{\s*\([^)]*\)\s+in",
        r"\$\d+",
        r"->\s*\w+",
    ]
    .iter()
    .map(|p| multiline(p))
    .collect()
});

static RUBY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bdef\s+\w+",
        r"\bend\b",
        r"\bclass\s+\w+(\s*<\s*\w+)?",
        r"\bmodule\s+\w+",
        r"\bputs\s+",
        r"\bp\s+",
        r#"\brequire\s+["']"#,
        r"\brequire_relative\s+",
        r"\bdo\s*\|[^|]*\|",
        r"\{\s*\|[^|]*\|\s*",
        r"\.each\s+do",
        r"\.map\s+do",
        r":\w+",
        r"@\w+",
        r"<<[-~]?\w+",
        r"\.(select|reject|find|any\?|all\?)\s*[{(]",
    ]
    .iter()
    .map(|p| multiline(p))
    .collect()
});

static TYPESCRIPT_ONLY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\binterface\s+\w+",
        r"\btype\s+\w+\s*=",
        r"\breadonly\s+\w+",
        r"\bimport\s+type\s+",
        r"\bexport\s+type\s+",
        r"<\w+\s+extends\s+\w+>",
    ]
    .iter()
    .map(|p| multiline(p))
    .collect()
});

static TYPESCRIPT_SHARED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r":\s*(string|number|boolean|any|void|never)\b",
        r":\s*\w+\[\]",
        r"<\w+>",
        r"\bas\s+\w+",
        r"\bprivate\s+\w+",
        r"\bpublic\s+\w+",
        r"\bprotected\s+\w+",
        r"\benum\s+\w+",
        r"^\s*@\w+",
    ]
    .iter()
    .map(|p| multiline(p))
    .collect()
});

fn score(code: &str, patterns: &[Regex]) -> usize {
    patterns.iter().filter(|p| p.is_match(code)).count()
}

/// Detect the most likely source language of `code`.
///
/// Returns `None` when no candidate clears the decision rule: the maximum
/// score is 0, or exactly 1 without a strict margin over the runner-up (the
/// Python-`print(...)` bias is the one exception).
#[must_use]
pub fn detect_language(code: &str) -> Option<&'static str> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }

    let ts_own_score = score(code, &TYPESCRIPT_ONLY_PATTERNS);
    let ts_shared_score = score(code, &TYPESCRIPT_SHARED_PATTERNS);

    let mut scores: Vec<(&'static str, usize)> = vec![
        ("Python", score(code, &PYTHON_PATTERNS)),
        ("JavaScript", score(code, &JAVASCRIPT_PATTERNS)),
        ("TypeScript", ts_own_score + ts_shared_score),
        ("Java", score(code, &JAVA_PATTERNS)),
        ("Kotlin", score(code, &KOTLIN_PATTERNS)),
        ("Swift", score(code, &SWIFT_PATTERNS)),
        ("C++", score(code, &CPP_PATTERNS)),
        ("Go", score(code, &GO_PATTERNS)),
        ("Rust", score(code, &RUST_PATTERNS)),
        ("Ruby", score(code, &RUBY_PATTERNS)),
    ];

    // TypeScript/JavaScript disambiguation: JavaScript-compatible syntax is
    // claimed by JavaScript unless a TypeScript-only construct is present, in
    // which case TypeScript wins regardless of the raw score comparison.
    if ts_own_score > 0 {
        if let Some(entry) = scores.iter_mut().find(|(name, _)| *name == "TypeScript") {
            entry.1 = entry.1.max(1000);
        }
    } else if let Some(entry) = scores.iter_mut().find(|(name, _)| *name == "TypeScript") {
        entry.1 = 0;
    }

    let max_score = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
    if max_score == 0 {
        return None;
    }

    // Ties broken by CANDIDATE_LANGUAGES declaration order.
    let top = CANDIDATE_LANGUAGES
        .iter()
        .filter_map(|name| scores.iter().find(|(n, _)| n == name).copied())
        .find(|(_, s)| *s == max_score)
        .map(|(name, _)| name)?;

    if max_score >= 2 {
        return Some(top);
    }

    // max_score == 1: apply the Python print() bias, else require a strict
    // margin over the runner-up.
    if top == "Python" && PYTHON_PRINT_CALL.is_match(code) {
        return Some("Python");
    }

    let mut sorted: Vec<usize> = scores.iter().map(|(_, s)| *s).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    if sorted.len() > 1 && sorted[0] > sorted[1] { Some(top) } else { None }
}

static PYTHON_PRINT_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bprint\s*\(").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_undetected() {
        assert_eq!(detect_language(""), None);
    }

    #[test]
    fn detects_python_function() {
        let code = "def add(a, b):\n    return a + b\n\nprint(add(1, 2))\n";
        assert_eq!(detect_language(code), Some("Python"));
    }

    #[test]
    fn detects_rust_function() {
        let code = "fn main() {\n    let mut x = 0;\n    println!(\"{}\", x);\n}\n";
        assert_eq!(detect_language(code), Some("Rust"));
    }

    #[test]
    fn typescript_interface_wins_over_javascript() {
        let code = "interface Point { x: number; y: number; }\nconst p: Point = { x: 1, y: 2 };\n";
        assert_eq!(detect_language(code), Some("TypeScript"));
    }

    #[test]
    fn plain_javascript_does_not_become_typescript() {
        let code = "function add(a, b) {\n  console.log(a + b);\n  return a + b;\n}\n";
        assert_eq!(detect_language(code), Some("JavaScript"));
    }

    #[test]
    fn single_ambiguous_token_is_undetected() {
        assert_eq!(detect_language("x = 1"), None);
    }
}
