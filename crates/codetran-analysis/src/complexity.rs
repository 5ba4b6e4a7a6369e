//! Cyclomatic complexity and Big-O estimation.
//!
//! Grounded in `complexity.py::ComplexityAnalyzer`: a per-language pattern
//! table drives function-body extraction, decision-point counting, nesting
//! depth, and a fixed Big-O decision order. Kotlin/Swift/C++/Ruby pattern
//! rows are built by analogy to their nearest sibling in the original table
//! (Kotlin~Java, Swift~C++, Ruby~Python) since the upstream table only
//! covered six of the ten detected languages.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Complexity rating thresholds, inclusive upper bounds.
pub const LOW_COMPLEXITY: u32 = 5;
/// Moderate complexity upper bound.
pub const MEDIUM_COMPLEXITY: u32 = 10;
/// High complexity upper bound; anything above is "very high".
pub const HIGH_COMPLEXITY: u32 = 20;

/// Estimated asymptotic time complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BigO {
    /// O(1)
    O1,
    /// O(log n)
    OLogN,
    /// O(n)
    ON,
    /// O(n log n)
    ONLogN,
    /// O(n^2)
    ONSquared,
    /// O(n^3)
    ONCubed,
    /// O(2^n)
    OTwoToN,
    /// O(n!)
    ONFactorial,
    /// No estimate could be formed.
    Unknown,
}

impl BigO {
    /// The conventional notation string, e.g. `"O(n log n)"`.
    #[must_use]
    pub fn notation(self) -> &'static str {
        match self {
            Self::O1 => "O(1)",
            Self::OLogN => "O(log n)",
            Self::ON => "O(n)",
            Self::ONLogN => "O(n log n)",
            Self::ONSquared => "O(n\u{b2})",
            Self::ONCubed => "O(n\u{b3})",
            Self::OTwoToN => "O(2^n)",
            Self::ONFactorial => "O(n!)",
            Self::Unknown => "Unknown",
        }
    }
}

/// Cyclomatic/Big-O/nesting analysis for a single function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionAnalysis {
    /// Function name.
    pub name: String,
    /// 1-based source line the function definition starts on.
    pub start_line: usize,
    /// 1-based source line the function body ends on.
    pub end_line: usize,
    /// Decision-point count plus one.
    pub cyclomatic_complexity: u32,
    /// Heuristic asymptotic estimate.
    pub estimated_big_o: BigO,
    /// Maximum brace/indent nesting depth within the body.
    pub nesting_depth: u32,
    /// Number of declared parameters.
    pub parameter_count: u32,
    /// Whether the function calls itself by name within its body.
    pub has_recursion: bool,
    /// Number of loop constructs.
    pub loop_count: u32,
    /// Number of branch constructs.
    pub branch_count: u32,
    /// Free-text optimization hints driven by fixed thresholds.
    pub suggestions: Vec<String>,
}

/// Module-level analysis: line accounting, function list, and aggregate
/// complexity figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeAnalysis {
    /// Language the analysis was performed under.
    pub language: String,
    /// Total line count.
    pub total_lines: usize,
    /// Lines counted as code (neither blank nor comment).
    pub code_lines: usize,
    /// Lines counted as comments.
    pub comment_lines: usize,
    /// Blank lines.
    pub blank_lines: usize,
    /// Per-function analyses, in source order.
    pub functions: Vec<FunctionAnalysis>,
    /// Mean cyclomatic complexity across functions, rounded to 2 places.
    pub average_complexity: f64,
    /// Maximum cyclomatic complexity across functions.
    pub max_complexity: u32,
    /// Worst-case Big-O across functions.
    pub overall_big_o: BigO,
    /// Free-text module-level suggestions.
    pub suggestions: Vec<String>,
}

struct LanguagePatterns {
    function: &'static Regex,
    class: Option<&'static Regex>,
    if_: Option<&'static Regex>,
    else_: Option<&'static Regex>,
    for_: Option<&'static Regex>,
    while_: Option<&'static Regex>,
    try_: Option<&'static Regex>,
    catch: Option<&'static Regex>,
    switch: Option<&'static Regex>,
    match_: Option<&'static Regex>,
    and: Option<&'static Regex>,
    or: Option<&'static Regex>,
    ternary: Option<&'static Regex>,
    comment: &'static Regex,
    indentation_based: bool,
}

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).unwrap());
    };
}

lazy_regex!(PY_FUNCTION, r"^\s*(async\s+)?def\s+(\w+)\s*\(");
lazy_regex!(PY_IF, r"\b(if|elif)\s+");
lazy_regex!(PY_ELSE, r"\belse\s*:");
lazy_regex!(PY_FOR, r"\bfor\s+\w+\s+in\s+");
lazy_regex!(PY_WHILE, r"\bwhile\s+");
lazy_regex!(PY_TRY, r"\btry\s*:");
lazy_regex!(PY_EXCEPT, r"\bexcept\s*");
lazy_regex!(PY_AND, r"\band\b");
lazy_regex!(PY_OR, r"\bor\b");
lazy_regex!(PY_TERNARY, r".+\sif\s+.+\selse\s+");
lazy_regex!(PY_COMMENT, r"^\s*#");

lazy_regex!(
    JS_FUNCTION,
    r"(?:function\s+(\w+)|(\w+)\s*[=:]\s*(?:async\s+)?function|\bconst\s+(\w+)\s*=\s*(?:async\s+)?\()"
);
lazy_regex!(JS_IF, r"\bif\s*\(");
lazy_regex!(JS_ELSE, r"\belse\s*[{\n]");
lazy_regex!(JS_FOR, r"\bfor\s*\(");
lazy_regex!(JS_WHILE, r"\bwhile\s*\(");
lazy_regex!(JS_TRY, r"\btry\s*\{");
lazy_regex!(JS_CATCH, r"\bcatch\s*\(");
lazy_regex!(JS_AND, r"&&");
lazy_regex!(JS_OR, r"\|\|");
lazy_regex!(JS_TERNARY, r"\?.+:");
lazy_regex!(JS_COMMENT, r"^\s*//");

lazy_regex!(
    JAVA_FUNCTION,
    r"(?:public|private|protected)\s+(?:static\s+)?(?:\w+(?:<[^>]+>)?)\s+(\w+)\s*\("
);

lazy_regex!(GO_FUNCTION, r"\bfunc\s+(?:\(\w+\s+\*?\w+\)\s+)?(\w+)\s*\(");
lazy_regex!(GO_IF, r"\bif\s+");
lazy_regex!(GO_ELSE, r"\belse\s*\{");
lazy_regex!(GO_FOR, r"\bfor\s+");
lazy_regex!(GO_SWITCH, r"\bswitch\s+");

lazy_regex!(RUST_FUNCTION, r"\bfn\s+(\w+)\s*[<(]");
lazy_regex!(RUST_IF, r"\bif\s+");
lazy_regex!(RUST_ELSE, r"\belse\s*\{");
lazy_regex!(RUST_FOR, r"\bfor\s+\w+\s+in\s+");
lazy_regex!(RUST_WHILE, r"\bwhile\s+");
lazy_regex!(RUST_MATCH, r"\bmatch\s+");

lazy_regex!(RUBY_FUNCTION, r"\bdef\s+(\w+)");
lazy_regex!(RUBY_IF, r"\b(if|elsif)\s+");
lazy_regex!(RUBY_ELSE, r"\belse\b");
lazy_regex!(RUBY_FOR, r"\bfor\s+\w+\s+in\s+");
lazy_regex!(RUBY_WHILE, r"\bwhile\s+");
lazy_regex!(RUBY_AND, r"\band\b|&&");
lazy_regex!(RUBY_OR, r"\bor\b|\|\|");
lazy_regex!(RUBY_COMMENT, r"^\s*#");

fn python_patterns() -> LanguagePatterns {
    LanguagePatterns {
        function: &PY_FUNCTION,
        class: None,
        if_: Some(&PY_IF),
        else_: Some(&PY_ELSE),
        for_: Some(&PY_FOR),
        while_: Some(&PY_WHILE),
        try_: Some(&PY_TRY),
        catch: Some(&PY_EXCEPT),
        switch: None,
        match_: None,
        and: Some(&PY_AND),
        or: Some(&PY_OR),
        ternary: Some(&PY_TERNARY),
        comment: &PY_COMMENT,
        indentation_based: true,
    }
}

fn c_style_patterns(function: &'static Regex) -> LanguagePatterns {
    LanguagePatterns {
        function,
        class: None,
        if_: Some(&JS_IF),
        else_: Some(&JS_ELSE),
        for_: Some(&JS_FOR),
        while_: Some(&JS_WHILE),
        try_: Some(&JS_TRY),
        catch: Some(&JS_CATCH),
        switch: None,
        match_: None,
        and: Some(&JS_AND),
        or: Some(&JS_OR),
        ternary: Some(&JS_TERNARY),
        comment: &JS_COMMENT,
        indentation_based: false,
    }
}

fn go_patterns() -> LanguagePatterns {
    LanguagePatterns {
        function: &GO_FUNCTION,
        class: None,
        if_: Some(&GO_IF),
        else_: Some(&GO_ELSE),
        for_: Some(&GO_FOR),
        while_: None,
        try_: None,
        catch: None,
        switch: Some(&GO_SWITCH),
        match_: None,
        and: Some(&JS_AND),
        or: Some(&JS_OR),
        ternary: None,
        comment: &JS_COMMENT,
        indentation_based: false,
    }
}

fn rust_patterns() -> LanguagePatterns {
    LanguagePatterns {
        function: &RUST_FUNCTION,
        class: None,
        if_: Some(&RUST_IF),
        else_: Some(&RUST_ELSE),
        for_: Some(&RUST_FOR),
        while_: Some(&RUST_WHILE),
        try_: None,
        catch: None,
        switch: None,
        match_: Some(&RUST_MATCH),
        and: Some(&JS_AND),
        or: Some(&JS_OR),
        ternary: None,
        comment: &JS_COMMENT,
        indentation_based: false,
    }
}

fn ruby_patterns() -> LanguagePatterns {
    LanguagePatterns {
        function: &RUBY_FUNCTION,
        class: None,
        if_: Some(&RUBY_IF),
        else_: Some(&RUBY_ELSE),
        for_: Some(&RUBY_FOR),
        while_: Some(&RUBY_WHILE),
        try_: None,
        catch: None,
        switch: None,
        match_: None,
        and: Some(&RUBY_AND),
        or: Some(&RUBY_OR),
        ternary: None,
        comment: &RUBY_COMMENT,
        indentation_based: true,
    }
}

fn patterns_for(language: &str) -> LanguagePatterns {
    match language {
        "Python" => python_patterns(),
        "JavaScript" | "TypeScript" => c_style_patterns(&JS_FUNCTION),
        "Java" | "Kotlin" => c_style_patterns(&JAVA_FUNCTION),
        "Go" => go_patterns(),
        "Rust" => rust_patterns(),
        "Ruby" => ruby_patterns(),
        "C++" | "Swift" => c_style_patterns(&JS_FUNCTION),
        _ => python_patterns(),
    }
}

/// Run a complete complexity/Big-O analysis of `code` under `language`.
#[must_use]
pub fn analyze(code: &str, language: &str) -> CodeAnalysis {
    let lines: Vec<&str> = code.split('\n').collect();
    let total_lines = lines.len();
    let blank_lines = lines.iter().filter(|l| l.trim().is_empty()).count();
    let comment_lines = count_comment_lines(code, language);
    let code_lines = total_lines.saturating_sub(blank_lines).saturating_sub(comment_lines);

    let patterns = patterns_for(language);
    let functions = analyze_functions(&lines, &patterns);

    let (average_complexity, max_complexity) = if functions.is_empty() {
        (0.0, 0)
    } else {
        #[allow(clippy::cast_precision_loss)]
        let sum: u32 = functions.iter().map(|f| f.cyclomatic_complexity).sum();
        #[allow(clippy::cast_precision_loss)]
        let avg = f64::from(sum) / functions.len() as f64;
        let max = functions.iter().map(|f| f.cyclomatic_complexity).max().unwrap_or(0);
        ((avg * 100.0).round() / 100.0, max)
    };

    let overall_big_o = functions.iter().map(|f| f.estimated_big_o).max().unwrap_or(BigO::O1);
    let suggestions = generate_overall_suggestions(&functions, average_complexity);

    CodeAnalysis {
        language: language.to_string(),
        total_lines,
        code_lines,
        comment_lines,
        blank_lines,
        functions,
        average_complexity,
        max_complexity,
        overall_big_o,
        suggestions,
    }
}

fn count_comment_lines(code: &str, language: &str) -> usize {
    let patterns = patterns_for(language);
    let mut count = 0usize;
    let mut in_block_comment = false;
    for line in code.split('\n') {
        if language == "Python" || language == "Ruby" {
            let trimmed = line.trim_start();
            if trimmed.starts_with("\"\"\"") || trimmed.starts_with("'''") {
                in_block_comment = !in_block_comment;
                count = count.saturating_add(1);
                continue;
            }
        } else {
            if line.contains("/*") {
                in_block_comment = true;
            }
            if line.contains("*/") {
                in_block_comment = false;
                count = count.saturating_add(1);
                continue;
            }
        }
        if in_block_comment || patterns.comment.is_match(line) {
            count = count.saturating_add(1);
        }
    }
    count
}

fn analyze_functions(lines: &[&str], patterns: &LanguagePatterns) -> Vec<FunctionAnalysis> {
    let mut functions = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(captures) = patterns.function.captures(line) else { continue };
        let name = captures
            .iter()
            .skip(1)
            .find_map(|m| m.map(|m| m.as_str().to_string()));
        let Some(name) = name else { continue };

        let start_line = i.saturating_add(1);
        let (end_line, body) = extract_function_body(lines, i, patterns.indentation_based);
        functions.push(analyze_single_function(&name, &body, start_line, end_line, patterns));
    }

    functions
}

fn extract_function_body(lines: &[&str], start_idx: usize, indentation_based: bool) -> (usize, String) {
    if indentation_based {
        let base_indent = lines[start_idx].len() - lines[start_idx].trim_start().len();
        let mut body_lines = vec![lines[start_idx]];
        for (offset, line) in lines.iter().enumerate().skip(start_idx.saturating_add(1)) {
            if !line.trim().is_empty() {
                let indent = line.len() - line.trim_start().len();
                if indent <= base_indent {
                    return (offset, body_lines.join("\n"));
                }
            }
            body_lines.push(line);
        }
        (lines.len(), body_lines.join("\n"))
    } else {
        let mut brace_count: i64 = 0;
        let mut found_start = false;
        let mut body_lines = Vec::new();
        for (offset, line) in lines.iter().enumerate().skip(start_idx) {
            body_lines.push(*line);
            brace_count = brace_count
                .saturating_add(line.matches('{').count() as i64)
                .saturating_sub(line.matches('}').count() as i64);
            if line.contains('{') {
                found_start = true;
            }
            if found_start && brace_count == 0 {
                return (offset.saturating_add(1), body_lines.join("\n"));
            }
        }
        (lines.len(), body_lines.join("\n"))
    }
}

fn analyze_single_function(
    name: &str,
    body: &str,
    start_line: usize,
    end_line: usize,
    patterns: &LanguagePatterns,
) -> FunctionAnalysis {
    let cyclomatic_complexity = calculate_cyclomatic_complexity(body, patterns);
    let loop_count = count_matches_many(body, &[patterns.for_, patterns.while_]);
    let branch_count =
        count_matches_many(body, &[patterns.if_, patterns.else_, patterns.switch, patterns.match_]);
    let nesting_depth = calculate_nesting_depth(body, patterns.indentation_based);

    let body_after_signature = body.splitn(2, '\n').nth(1).unwrap_or("");
    let recursion_pattern = Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))).ok();
    let has_recursion =
        recursion_pattern.is_some_and(|pattern| pattern.is_match(body_after_signature));

    let estimated_big_o = estimate_big_o(body, loop_count, has_recursion);
    let parameter_count = count_parameters(body);
    let suggestions =
        generate_function_suggestions(name, cyclomatic_complexity, nesting_depth, loop_count, has_recursion);

    FunctionAnalysis {
        name: name.to_string(),
        start_line,
        end_line,
        cyclomatic_complexity,
        estimated_big_o,
        nesting_depth,
        parameter_count,
        has_recursion,
        loop_count,
        branch_count,
        suggestions,
    }
}

fn count_matches_many(body: &str, patterns: &[Option<&Regex>]) -> u32 {
    patterns
        .iter()
        .filter_map(|p| *p)
        .map(|p| p.find_iter(body).count() as u32)
        .fold(0u32, u32::saturating_add)
}

fn calculate_cyclomatic_complexity(body: &str, patterns: &LanguagePatterns) -> u32 {
    let mut complexity: u32 = 1;
    let decision_patterns = [
        patterns.if_,
        patterns.else_,
        patterns.for_,
        patterns.while_,
        patterns.try_,
        patterns.catch,
        patterns.switch,
        patterns.match_,
        patterns.and,
        patterns.or,
    ];
    complexity = complexity.saturating_add(count_matches_many(body, &decision_patterns));
    if let Some(ternary) = patterns.ternary {
        complexity = complexity.saturating_add(ternary.find_iter(body).count() as u32);
    }
    complexity
}

fn calculate_nesting_depth(body: &str, indentation_based: bool) -> u32 {
    if indentation_based {
        body.split('\n')
            .filter(|l| !l.trim().is_empty())
            .map(|l| ((l.len() - l.trim_start().len()) / 4) as u32)
            .max()
            .unwrap_or(0)
    } else {
        let mut max_depth: i64 = 0;
        let mut depth: i64 = 0;
        for c in body.chars() {
            match c {
                '{' => {
                    depth = depth.saturating_add(1);
                    max_depth = max_depth.max(depth);
                },
                '}' => depth = (depth.saturating_sub(1)).max(0),
                _ => {},
            }
        }
        max_depth.max(0) as u32
    }
}

fn count_parameters(body: &str) -> u32 {
    static PARAM_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]*)\)").unwrap());
    let Some(captures) = PARAM_LIST.captures(body) else { return 0 };
    let params = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    if params.trim().is_empty() {
        0
    } else {
        params.split(',').filter(|p| !p.trim().is_empty()).count() as u32
    }
}

static NESTED_LOOP_PYTHON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)for.*:\s*\n\s+for").unwrap());
static NESTED_LOOP_C_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)for\s*\([^)]+\)\s*\{[^}]*for\s*\(").unwrap());
static SORT_SIGNATURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.sort\(|sorted\(|Arrays\.sort").unwrap());
static BINARY_SEARCH_SIGNATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)while\s+(left|lo|low)\s*[<>=]+\s*(right|hi|high)|mid\s*=\s*\([^)]+\)\s*/\s*2|bisect|binary[_\s]?search")
        .unwrap()
});

fn estimate_big_o(body: &str, loop_count: u32, has_recursion: bool) -> BigO {
    let nested_loops =
        NESTED_LOOP_PYTHON.find_iter(body).count() + NESTED_LOOP_C_STYLE.find_iter(body).count();
    let has_sort = SORT_SIGNATURE.is_match(body);
    let has_binary_search = BINARY_SEARCH_SIGNATURE.is_match(body);

    if has_recursion && nested_loops > 0 {
        BigO::OTwoToN
    } else if nested_loops >= 2 {
        BigO::ONCubed
    } else if nested_loops == 1 {
        BigO::ONSquared
    } else if has_sort {
        BigO::ONLogN
    } else if has_binary_search {
        BigO::OLogN
    } else if loop_count >= 1 {
        BigO::ON
    } else if has_recursion {
        BigO::ON
    } else {
        BigO::O1
    }
}

fn generate_function_suggestions(
    name: &str,
    complexity: u32,
    nesting_depth: u32,
    loop_count: u32,
    has_recursion: bool,
) -> Vec<String> {
    let mut suggestions = Vec::new();
    if complexity > HIGH_COMPLEXITY {
        suggestions.push(format!(
            "{name}: high complexity ({complexity}). Consider breaking into smaller functions."
        ));
    } else if complexity > MEDIUM_COMPLEXITY {
        suggestions.push(format!(
            "{name}: moderate complexity ({complexity}). Review for potential simplification."
        ));
    }
    if nesting_depth > 4 {
        suggestions.push(format!(
            "{name}: deep nesting ({nesting_depth} levels). Consider early returns or guard clauses."
        ));
    }
    if loop_count > 2 {
        suggestions.push(format!(
            "{name}: multiple loops detected. Consider combining or using more efficient data structures."
        ));
    }
    if has_recursion {
        suggestions.push(format!(
            "{name}: contains recursion. Ensure the base case is correct and consider iteration."
        ));
    }
    suggestions
}

fn generate_overall_suggestions(functions: &[FunctionAnalysis], average_complexity: f64) -> Vec<String> {
    let mut suggestions = Vec::new();
    if average_complexity > f64::from(MEDIUM_COMPLEXITY) {
        suggestions.push(format!(
            "High average complexity ({average_complexity:.1}). Consider refactoring complex functions."
        ));
    }
    let high: Vec<&str> = functions
        .iter()
        .filter(|f| f.cyclomatic_complexity > HIGH_COMPLEXITY)
        .map(|f| f.name.as_str())
        .collect();
    if !high.is_empty() {
        suggestions.push(format!(
            "Functions with high complexity: {}. Priority targets for refactoring.",
            high.join(", ")
        ));
    }
    if functions.iter().any(|f| f.nesting_depth > 4) {
        suggestions.push("Some functions have deep nesting. Consider flattening with early returns.".to_string());
    }
    let recursive = functions.iter().filter(|f| f.has_recursion).count();
    if recursive > 0 {
        suggestions.push(format!("{recursive} recursive function(s) detected. Verify termination conditions."));
    }
    suggestions
}

/// Human-readable rating for a raw cyclomatic complexity value.
#[must_use]
pub fn complexity_rating(complexity: u32) -> &'static str {
    if complexity <= LOW_COMPLEXITY {
        "Low"
    } else if complexity <= MEDIUM_COMPLEXITY {
        "Moderate"
    } else if complexity <= HIGH_COMPLEXITY {
        "High"
    } else {
        "Very High"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_function_has_base_complexity_one() {
        let code = "def greet(name):\n    return f\"hi {name}\"\n";
        let analysis = analyze(code, "Python");
        assert_eq!(analysis.functions.len(), 1);
        assert_eq!(analysis.functions[0].cyclomatic_complexity, 1);
        assert_eq!(analysis.functions[0].estimated_big_o, BigO::O1);
    }

    #[test]
    fn branching_function_increases_complexity() {
        let code = "def classify(x):\n    if x > 0:\n        return 1\n    elif x < 0:\n        return -1\n    else:\n        return 0\n";
        let analysis = analyze(code, "Python");
        assert!(analysis.functions[0].cyclomatic_complexity >= 3);
    }

    #[test]
    fn nested_loops_are_detected_as_quadratic() {
        let code = "def pairs(items):\n    for a in items:\n        for b in items:\n            print(a, b)\n";
        let analysis = analyze(code, "Python");
        assert_eq!(analysis.functions[0].estimated_big_o, BigO::ONSquared);
    }

    #[test]
    fn recursive_function_is_flagged() {
        let code = "def factorial(n):\n    if n <= 1:\n        return 1\n    return n * factorial(n - 1)\n";
        let analysis = analyze(code, "Python");
        assert!(analysis.functions[0].has_recursion);
    }

    #[test]
    fn rust_brace_function_tracks_nesting() {
        let code = "fn f() {\n    if true {\n        if true {\n            println!(\"x\");\n        }\n    }\n}\n";
        let analysis = analyze(code, "Rust");
        assert_eq!(analysis.functions.len(), 1);
        assert!(analysis.functions[0].nesting_depth >= 2);
    }

    #[test]
    fn iterative_binary_search_is_logarithmic() {
        let code = "def binary_search(items, target):\n    left = 0\n    right = len(items) - 1\n    while left <= right:\n        mid = (left + right) / 2\n        if items[mid] == target:\n            return mid\n        elif items[mid] < target:\n            left = mid + 1\n        else:\n            right = mid - 1\n    return -1\n";
        let analysis = analyze(code, "Python");
        assert_eq!(analysis.functions.len(), 1);
        assert_eq!(analysis.functions[0].estimated_big_o, BigO::OLogN);
        assert!(analysis.functions[0].cyclomatic_complexity >= 4);
        assert_eq!(analysis.overall_big_o, BigO::OLogN);
    }

    #[test]
    fn complexity_rating_thresholds() {
        assert_eq!(complexity_rating(3), "Low");
        assert_eq!(complexity_rating(8), "Moderate");
        assert_eq!(complexity_rating(15), "High");
        assert_eq!(complexity_rating(25), "Very High");
    }
}
