//! Single rewrite mode for feedback given with `--text`.

use std::io::{self, Write};

use tactful::{RewriteError, RewritePipeline, TactfulConfig};

use super::export::{ExportPlan, export_history};
use super::output::write_result;
use super::session::Session;

/// Runs single rewrite mode.
///
/// # Errors
///
/// Returns an error if the text is missing or blank, configuration is
/// invalid, or writing output fails. Backend failures never surface here;
/// they degrade to the local enhancement.
pub fn run(config: &TactfulConfig) -> Result<(), RewriteError> {
    let pipeline = RewritePipeline::from_config(config)?;
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    run_with_pipeline(&mut writer, config, &pipeline)
}

/// Runs single rewrite mode against an explicit pipeline.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_pipeline<W: Write>(
    writer: &mut W,
    config: &TactfulConfig,
    pipeline: &RewritePipeline,
) -> Result<(), RewriteError> {
    let request = config.rewrite_request(config.require_text()?)?;
    let export = ExportPlan::resolve(config)?;
    let mut session = Session::open(config, pipeline)?;

    let result = session.submit(&request);
    write_result(writer, &result)?;

    export_history(export.as_ref(), session.history().entries())
}
