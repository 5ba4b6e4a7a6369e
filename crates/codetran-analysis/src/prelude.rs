//! Common imports for consumers of `codetran-analysis`.

pub use crate::{
    analyze, complexity_rating, detect_language, extract_functions, generate_placeholder_test, generate_tests,
    parse_notebook, serialize_notebook, transform_notebook, AnalysisError, AnalysisResult, BigO, CellKind,
    CellTranslation, CodeAnalysis, FunctionAnalysis, FunctionSignature, NotebookCell, NotebookDocument,
    NotebookStats, TestFramework, CANDIDATE_LANGUAGES,
};
