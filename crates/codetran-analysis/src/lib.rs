//! Static-analysis engines for codetran: language detection, cyclomatic
//! complexity and Big-O estimation, test-skeleton generation, and notebook
//! transformation.
//!
//! ```no_run
//! use codetran_analysis::prelude::*;
//!
//! let language = detect_language("def greet(name):\n    print(name)\n");
//! assert_eq!(language, Some("Python"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all)]

mod complexity;
mod detector;
mod error;
mod notebook;
mod test_generator;

pub mod prelude;

pub use complexity::{
    analyze, complexity_rating, BigO, CodeAnalysis, FunctionAnalysis, HIGH_COMPLEXITY, LOW_COMPLEXITY,
    MEDIUM_COMPLEXITY,
};
pub use detector::{detect_language, CANDIDATE_LANGUAGES};
pub use error::{AnalysisError, AnalysisResult};
pub use notebook::{
    parse as parse_notebook, serialize as serialize_notebook, transform as transform_notebook, CellKind,
    CellTranslation, NotebookCell, NotebookDocument, NotebookStats,
};
pub use test_generator::{
    extract_functions, generate_placeholder_test, generate_tests, FunctionSignature, TestFramework,
};
