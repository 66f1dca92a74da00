//! HTML rendering of wizard state
//!
//! Every fragment is a minijinja template named `*.html`, so all values are
//! HTML-escaped on output. AI-supplied text never reaches the page raw.

use minijinja::{context, Environment};

use manus_core::prelude::*;
use manus_core::{AnalysisResult, ProjectStructure, StagedFile};

use crate::state::{AppState, ExplorerState};

pub mod view;

pub use view::{ExplorerView, FileListView, OverviewView, ReportView, ResultsView};

const TEMPLATES: &[(&str, &str)] = &[
    ("results.html", include_str!("templates/results.html")),
    ("file_list.html", include_str!("templates/file_list.html")),
    ("overview.html", include_str!("templates/overview.html")),
    ("explorer.html", include_str!("templates/explorer.html")),
    ("report.html", include_str!("templates/report.html")),
];

fn render_error(e: minijinja::Error) -> Error {
    Error::render(e.to_string())
}

/// Template environment with all fragments loaded
#[derive(Debug)]
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source).map_err(render_error)?;
        }
        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        let template = self.env.get_template(name).map_err(render_error)?;
        template.render(ctx).map_err(render_error)
    }

    /// Metrics, summary and the issue lists of one analysis
    pub fn results(&self, result: &AnalysisResult) -> Result<String> {
        self.render(
            "results.html",
            context! { result => ResultsView::from(result) },
        )
    }

    pub fn file_list(&self, files: &[StagedFile]) -> Result<String> {
        self.render(
            "file_list.html",
            context! { files => FileListView::new(files) },
        )
    }

    pub fn overview(&self, structure: &ProjectStructure) -> Result<String> {
        self.render(
            "overview.html",
            context! { overview => OverviewView::from(structure) },
        )
    }

    pub fn explorer(&self, explorer: &ExplorerState) -> Result<String> {
        self.render(
            "explorer.html",
            context! { explorer => ExplorerView::from(explorer) },
        )
    }

    /// Standalone page with the step navigator, overview and results
    pub fn report(&self, state: &AppState) -> Result<String> {
        let report = ReportView::from(state);
        self.render(
            "report.html",
            context! {
                title => report.title,
                session_id => report.session_id,
                elapsed => report.elapsed,
                steps => report.steps,
                task => report.task,
                overview => report.overview,
                result => report.result,
            },
        )
    }
}
