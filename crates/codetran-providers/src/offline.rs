//! Rule-based offline translator: no network, no model, line-oriented
//! regex rewrites for the common syntax shapes of Python, JavaScript, and
//! Java. Lower fidelity than a model-backed provider by design; exists as
//! the always-available fallback.
//!
//! Grounded in the upstream `OfflineTranslator`: per-pair line rewrites, an
//! indentation-tracking Python-to-brace-language transform, and a generic
//! fallback that prepends an advisory comment and returns the input
//! unchanged for pairs with no dedicated rule set.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ProviderResult;
use crate::provider::TranslationProvider;
use crate::types::{ProviderCapabilities, ProviderStatus, TranslationOptions, TranslationOutcome};

const CONFIDENCE: f64 = 0.7;

/// The always-available, network-free translator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineProvider;

#[async_trait]
impl TranslationProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    async fn initialize(&self) -> ProviderResult<()> {
        Ok(())
    }

    async fn translate(
        &self,
        code: &str,
        source_lang: &str,
        target_lang: &str,
        _options: &TranslationOptions,
    ) -> ProviderResult<TranslationOutcome> {
        let text = translate_offline(code, source_lang, target_lang);
        let confidence = if source_lang.eq_ignore_ascii_case(target_lang) { 1.0 } else { CONFIDENCE };
        Ok(TranslationOutcome::new(text, confidence))
    }

    async fn explain(&self, code: &str, language: &str, line_by_line: bool) -> ProviderResult<String> {
        if line_by_line {
            let lines: Vec<String> = code
                .lines()
                .enumerate()
                .map(|(i, line)| format!("{}: {}", i + 1, line.trim()))
                .collect();
            Ok(format!("{language} code, {} lines:\n{}", lines.len(), lines.join("\n")))
        } else {
            Ok(format!("{language} snippet of {} lines; no model available for a semantic explanation.", code.lines().count()))
        }
    }

    async fn health_probe(&self) -> ProviderResult<ProviderStatus> {
        Ok(ProviderStatus::Healthy)
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supported_pairs: vec![
                "python->javascript".into(),
                "python->java".into(),
                "javascript->python".into(),
                "java->python".into(),
                "java->javascript".into(),
            ],
            max_input_chars: usize::MAX,
            supports_explain: true,
            requires_network: false,
        }
    }
}

fn translate_offline(code: &str, source_lang: &str, target_lang: &str) -> String {
    if source_lang.eq_ignore_ascii_case(target_lang) {
        return code.to_string();
    }
    match (source_lang.to_ascii_lowercase().as_str(), target_lang.to_ascii_lowercase().as_str()) {
        ("python", "javascript") => python_to_javascript(code),
        ("javascript", "python") => javascript_to_python(code),
        ("java", "python") => java_to_python(code),
        ("java", "javascript") => java_to_javascript(code),
        _ => generic_translation(code, source_lang, target_lang),
    }
}

static PY_DEF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)def\s+(\w+)\s*\((.*?)\)\s*:\s*$").unwrap());
static PY_IF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)if\s+(.*?):\s*$").unwrap());
static PY_FOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)for\s+(\w+)\s+in\s+(.*?):\s*$").unwrap());
static PY_PRINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"print\s*\((.*?)\)").unwrap());
static PY_SELF: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bself\.").unwrap());

/// Line-oriented Python-to-JavaScript rewrite, tracking indentation to close
/// the braces Python expresses through dedentation alone.
fn python_to_javascript(code: &str) -> String {
    let mut out = Vec::new();
    let mut indent_stack: Vec<usize> = vec![0];

    for line in code.lines() {
        if line.trim().is_empty() {
            out.push(line.to_string());
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        while indent_stack.len() > 1 && indent < *indent_stack.last().unwrap() {
            indent_stack.pop();
            let depth = indent_stack.len().saturating_sub(1);
            out.push(format!("{}}}", "    ".repeat(depth)));
        }

        if let Some(caps) = PY_DEF.captures(line) {
            out.push(format!("{}function {}({}) {{", &caps[1], &caps[2], &caps[3]));
            indent_stack.push(indent);
            continue;
        }
        if let Some(caps) = PY_IF.captures(line) {
            out.push(format!("{}if ({}) {{", &caps[1], &caps[2]));
            indent_stack.push(indent);
            continue;
        }
        if let Some(caps) = PY_FOR.captures(line) {
            out.push(format!("{}for (const {} of {}) {{", &caps[1], &caps[2], &caps[3]));
            indent_stack.push(indent);
            continue;
        }

        let mut rewritten = PY_PRINT.replace_all(line, "console.log($1)").into_owned();
        rewritten = PY_SELF.replace_all(&rewritten, "this.").into_owned();
        out.push(rewritten);
    }

    while indent_stack.len() > 1 {
        indent_stack.pop();
        out.push("}".to_string());
    }
    out.join("\n")
}

static JS_FUNC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)function\s+(\w+)\s*\((.*?)\)\s*\{\s*$").unwrap());
static JS_CONSOLE_LOG: Lazy<Regex> = Lazy::new(|| Regex::new(r"console\.log\s*\((.*?)\)").unwrap());
static JS_THIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bthis\.").unwrap());
static JS_TRAILING_SEMI: Lazy<Regex> = Lazy::new(|| Regex::new(r";\s*$").unwrap());
static JS_DECL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(const|let|var)\s+").unwrap());

/// Line-oriented JavaScript-to-Python rewrite. Closing braces are dropped
/// rather than converted, matching the lossy nature of a brace-to-indent
/// transform done without a real parser.
fn javascript_to_python(code: &str) -> String {
    let mut out = Vec::new();
    for line in code.lines() {
        if let Some(caps) = JS_FUNC.captures(line) {
            out.push(format!("{}def {}({}):", &caps[1], &caps[2], &caps[3]));
            continue;
        }
        if line.trim() == "}" {
            continue;
        }
        let mut rewritten = JS_CONSOLE_LOG.replace_all(line, "print($1)").into_owned();
        rewritten = JS_THIS.replace_all(&rewritten, "self.").into_owned();
        rewritten = JS_TRAILING_SEMI.replace_all(&rewritten, "").into_owned();
        rewritten = JS_DECL.replace_all(&rewritten, "").into_owned();
        out.push(rewritten);
    }
    out.join("\n")
}

static JAVA_METHOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(?:public|private|protected)?\s*(?:static)?\s*\w+\s+(\w+)\s*\((.*?)\)\s*\{\s*$").unwrap());
static JAVA_PRINTLN: Lazy<Regex> = Lazy::new(|| Regex::new(r"System\.out\.println\s*\((.*?)\)").unwrap());
static JAVA_TYPE_DECL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(int|double|String|boolean|float|char|long)\s+(\w+)").unwrap());
static JAVA_PARAM_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+\s+(\w+)").unwrap());

/// Line-oriented Java-to-Python rewrite: strips type declarations and
/// visibility modifiers rather than translating them.
fn java_to_python(code: &str) -> String {
    let mut out = Vec::new();
    for line in code.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("package") || trimmed.starts_with("import") {
            continue;
        }
        if let Some(caps) = JAVA_METHOD.captures(line) {
            let simple_params = JAVA_PARAM_TYPE.replace_all(&caps[3], "$1").into_owned();
            out.push(format!("{}def {}({}):", &caps[1], &caps[2], simple_params));
            continue;
        }
        if line.trim() == "}" {
            continue;
        }
        let mut rewritten = JAVA_PRINTLN.replace_all(line, "print($1)").into_owned();
        rewritten = JAVA_TYPE_DECL.replace_all(&rewritten, "$2").into_owned();
        rewritten = JS_TRAILING_SEMI.replace_all(&rewritten, "").into_owned();
        out.push(rewritten);
    }
    out.join("\n")
}

static JAVA_VAR_DECL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(int|double|String|boolean|float|char|long)\s+(\w+)\s*=").unwrap());

/// Line-oriented Java-to-JavaScript rewrite: replaces typed declarations
/// with `let` and leaves control-flow braces untouched (both languages use
/// them identically).
fn java_to_javascript(code: &str) -> String {
    let mut out = Vec::new();
    for line in code.lines() {
        if line.trim_start().starts_with("package") {
            continue;
        }
        let mut rewritten = JAVA_PRINTLN.replace_all(line, "console.log($1)").into_owned();
        rewritten = JAVA_VAR_DECL.replace_all(&rewritten, "let $2 =").into_owned();
        out.push(rewritten);
    }
    out.join("\n")
}

fn generic_translation(code: &str, source_lang: &str, target_lang: &str) -> String {
    format!("// Note: direct translation from {source_lang} to {target_lang} has no offline rule set; manual adjustment required\n{code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_language_is_a_no_op() {
        assert_eq!(translate_offline("x = 1", "Python", "Python"), "x = 1");
    }

    #[tokio::test]
    async fn identity_translation_reports_full_confidence() {
        let outcome = OfflineProvider.translate("x = 1", "Python", "Python", &TranslationOptions::default()).await.unwrap();
        assert_eq!(outcome.text, "x = 1");
        assert!((outcome.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn cross_language_translation_reports_offline_confidence() {
        let outcome =
            OfflineProvider.translate("def f(): pass", "Python", "JavaScript", &TranslationOptions::default()).await.unwrap();
        assert!((outcome.confidence - CONFIDENCE).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn initialize_is_a_no_op_on_repeated_calls() {
        let provider = OfflineProvider;
        provider.initialize().await.unwrap();
        provider.initialize().await.unwrap();
    }

    #[test]
    fn translates_python_function_to_javascript() {
        let code = "def add(a, b):\n    print(a + b)\n";
        let translated = python_to_javascript(code);
        assert!(translated.contains("function add(a, b) {"));
        assert!(translated.contains("console.log(a + b)"));
        assert!(translated.trim_end().ends_with('}'));
    }

    #[test]
    fn translates_javascript_function_to_python() {
        let code = "function add(a, b) {\n    console.log(a + b);\n}\n";
        let translated = javascript_to_python(code);
        assert!(translated.contains("def add(a, b):"));
        assert!(translated.contains("print(a + b)"));
        assert!(!translated.contains('}'));
    }

    #[test]
    fn translates_java_method_to_python() {
        let code = "public static int add(int a, int b) {\n    System.out.println(a);\n}\n";
        let translated = java_to_python(code);
        assert!(translated.contains("def add(a, b):"));
        assert!(translated.contains("print(a)"));
    }

    #[test]
    fn unsupported_pair_falls_back_to_advisory_comment() {
        let translated = translate_offline("10 PRINT \"HI\"", "basic", "cobol");
        assert!(translated.starts_with("// Note:"));
        assert!(translated.contains("10 PRINT \"HI\""));
    }

    #[tokio::test]
    async fn health_probe_is_always_healthy() {
        let provider = OfflineProvider;
        assert_eq!(provider.health_probe().await.unwrap(), ProviderStatus::Healthy);
    }
}
