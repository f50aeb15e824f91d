//! Source sampling and lightweight Python analysis.

use log::warn;
use rustpython_parser::ast::{self, ExceptHandler, Stmt};
use rustpython_parser::{Mode, parse};
use serde::{Deserialize, Serialize};

use crate::config::EngineLimits;
use crate::domain::{AnalysisSample, FileEntry};

/// Path fragment that marks continuous-integration configuration.
pub const CI_MARKER: &str = ".github/workflows";
/// Suffix of Python source files.
pub const PYTHON_SUFFIX: &str = ".py";

/// Bounded view of a tree listing.
#[derive(Debug, Clone)]
pub struct SourceSample<'a> {
    tree: &'a [FileEntry],
    window: &'a [FileEntry],
    python_files: Vec<&'a str>,
}

impl<'a> SourceSample<'a> {
    /// Take the leading sample window of `tree` and collect its Python files.
    pub fn new(tree: &'a [FileEntry], limits: &EngineLimits) -> Self {
        let window = &tree[..tree.len().min(limits.sample_window)];
        let python_files = window
            .iter()
            .map(|entry| entry.path.as_str())
            .filter(|path| path.ends_with(PYTHON_SUFFIX))
            .collect();
        Self {
            tree,
            window,
            python_files,
        }
    }

    /// Leading entries of the tree, in upstream order.
    pub fn window(&self) -> &'a [FileEntry] {
        self.window
    }

    /// Every Python path inside the window.
    pub fn python_candidates(&self) -> &[&'a str] {
        &self.python_files
    }

    /// Python paths whose content is fetched and parsed.
    pub fn files_to_analyze(&self, limits: &EngineLimits) -> &[&'a str] {
        &self.python_files[..self.python_files.len().min(limits.analyzed_files)]
    }

    /// Whether any Python candidate path mentions "test", ignoring case.
    pub fn has_tests(&self) -> bool {
        self.python_files
            .iter()
            .any(|path| path.to_lowercase().contains("test"))
    }

    /// Whether any entry of the full tree lives under the CI marker.
    pub fn has_ci(&self) -> bool {
        self.tree.iter().any(|entry| entry.path.contains(CI_MARKER))
    }
}

/// Parse Python source and count definitions.
///
/// Unparsable source yields the zero sample. Every nested definition is
/// visited; only plain `def` counts as a function.
pub fn analyze_python(source: &str) -> AnalysisSample {
    let module = match parse(source, Mode::Module, "<sample>") {
        Ok(ast::Mod::Module(module)) => module,
        Ok(_) => return AnalysisSample::default(),
        Err(err) => {
            warn!("skipping unparsable python source: {err}");
            return AnalysisSample::default();
        }
    };

    let mut tally = Tally::default();
    tally.walk(&module.body);

    let function_count = tally.body_lengths.len();
    let avg_function_body_length = if function_count == 0 {
        0.0
    } else {
        tally.body_lengths.iter().sum::<usize>() as f64 / function_count as f64
    };

    AnalysisSample {
        function_count,
        class_count: tally.classes,
        avg_function_body_length,
    }
}

#[derive(Default)]
struct Tally {
    body_lengths: Vec<usize>,
    classes: usize,
}

impl Tally {
    fn walk(&mut self, body: &[Stmt]) {
        for stmt in body {
            match stmt {
                Stmt::FunctionDef(func) => {
                    self.body_lengths.push(func.body.len());
                    self.walk(&func.body);
                }
                Stmt::AsyncFunctionDef(func) => self.walk(&func.body),
                Stmt::ClassDef(class) => {
                    self.classes += 1;
                    self.walk(&class.body);
                }
                Stmt::For(stmt) => {
                    self.walk(&stmt.body);
                    self.walk(&stmt.orelse);
                }
                Stmt::AsyncFor(stmt) => {
                    self.walk(&stmt.body);
                    self.walk(&stmt.orelse);
                }
                Stmt::While(stmt) => {
                    self.walk(&stmt.body);
                    self.walk(&stmt.orelse);
                }
                Stmt::If(stmt) => {
                    self.walk(&stmt.body);
                    self.walk(&stmt.orelse);
                }
                Stmt::With(stmt) => self.walk(&stmt.body),
                Stmt::AsyncWith(stmt) => self.walk(&stmt.body),
                Stmt::Match(stmt) => {
                    for case in &stmt.cases {
                        self.walk(&case.body);
                    }
                }
                Stmt::Try(stmt) => {
                    self.walk(&stmt.body);
                    self.walk_handlers(&stmt.handlers);
                    self.walk(&stmt.orelse);
                    self.walk(&stmt.finalbody);
                }
                Stmt::TryStar(stmt) => {
                    self.walk(&stmt.body);
                    self.walk_handlers(&stmt.handlers);
                    self.walk(&stmt.orelse);
                    self.walk(&stmt.finalbody);
                }
                _ => {}
            }
        }
    }

    fn walk_handlers(&mut self, handlers: &[ExceptHandler]) {
        for handler in handlers {
            let ExceptHandler::ExceptHandler(handler) = handler;
            self.walk(&handler.body);
        }
    }
}

/// Metrics combined across the analysed files of one repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    /// Functions found across analysed files.
    pub function_count: usize,
    /// Classes found across analysed files.
    pub class_count: usize,
    /// Summed per-file averages over the candidate count.
    pub avg_function_body_length: f64,
}

/// Combine per-file samples.
///
/// The summed averages are divided by `candidate_count`, the number of
/// Python files in the sample window, not by the number of files analysed.
/// Repositories with more candidates than the analysis cap therefore get a
/// diluted average.
pub fn aggregate(samples: &[AnalysisSample], candidate_count: usize) -> AggregateMetrics {
    let summed: f64 = samples
        .iter()
        .map(|sample| sample.avg_function_body_length)
        .sum();
    AggregateMetrics {
        function_count: samples.iter().map(|sample| sample.function_count).sum(),
        class_count: samples.iter().map(|sample| sample.class_count).sum(),
        avg_function_body_length: summed / candidate_count.max(1) as f64,
    }
}
