//! Operator-facing renderings of a plan.

use std::fmt::Write as _;
use std::path::Path;

use relief_types::{PauseStyle, Slicer, SwapPlan};

use crate::error::PlanResult;
use crate::io::write_text;

/// Render a plan as a fixed-width table followed by its notes.
///
/// ```
/// # use relief_types::*;
/// # let plan = SwapPlan {
/// #     app: APP_NAME.into(), strategy: Strategy::Bands, layer_height: 0.2,
/// #     settings: PlanSettings::default(), palette: vec![], filaments: vec![],
/// #     steps: vec![SwapStep { index: 1, height_mm: 1.5, layer: 8,
/// #         filament: "White".into(), command: None }],
/// #     notes: vec!["done".into()],
/// # };
/// let text = relief_plan::plan_to_text(&plan);
/// assert!(text.contains("  1 |     8 |      1.500 | White | -"));
/// ```
#[must_use]
pub fn plan_to_text(plan: &SwapPlan) -> String {
    let mut out = String::new();
    out.push_str("2D→3D Relief Swap Plan\n");
    let _ = writeln!(out, "Strategy: {}", plan.strategy);
    out.push('\n');
    out.push_str("Idx | Layer | Height(mm) | Filament | Command\n");
    out.push_str("----|-------|------------|----------|--------\n");
    for s in &plan.steps {
        let _ = writeln!(
            out,
            "{:>3} | {:>5} | {:>10.3} | {} | {}",
            s.index,
            s.layer,
            s.height_mm,
            s.filament,
            s.command.as_deref().unwrap_or("-")
        );
    }
    out.push('\n');
    out.push_str(&plan.notes.join("\n"));
    out
}

/// Pause-script snippet: a header comment, then for each step with a
/// command a `; Layer N` comment and the bare command.
#[must_use]
pub fn snippet_text(plan: &SwapPlan) -> String {
    let mut out = String::from("; swap snippet\n");
    for (step, command) in plan.commanded_steps() {
        let _ = writeln!(out, "; Layer {}", step.layer);
        out.push_str(command);
        out.push('\n');
    }
    out
}

/// Write [`snippet_text`] to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn export_snippet(path: impl AsRef<Path>, plan: &SwapPlan) -> PlanResult<()> {
    write_text(path, &snippet_text(plan))
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Short step-by-step guide for inserting pauses in a slicer.
#[must_use]
pub fn slicer_guide(slicer: Slicer, style: PauseStyle) -> String {
    format!(
        "{} guide:\n\
         1) Open print settings and layer preview.\n\
         2) Add pauses at planned layers/heights.\n\
         3) Pause command: {}.\n\
         4) Resume print after filament swap and purge.",
        title_case(slicer.as_str()),
        style.command().unwrap_or("(none)")
    )
}
