//! `omoprof diff`

use anyhow::Result;
use omoprof_core::diff::display::format_side_by_side;
use omoprof_core::diff::{compute_unified_diff, diff_configs, DiffSummary};

use crate::context::AppContext;

pub fn run(ctx: &AppContext, left: &str, right: &str, side_by_side: bool, width: usize) -> Result<()> {
    let a = ctx.store.load(left)?;
    let b = ctx.store.load(right)?;

    if side_by_side {
        let result = diff_configs(&a.config, &b.config)?;
        print!("{}", format_side_by_side(&result, width.max(10)));
        return Ok(());
    }

    let a_text = a.config.to_json_pretty()?;
    let b_text = b.config.to_json_pretty()?;
    print!(
        "{}",
        compute_unified_diff(left, right, a_text.as_bytes(), b_text.as_bytes())
    );

    let summary = DiffSummary::from_result(&diff_configs(&a.config, &b.config)?);
    eprintln!("{}", summary.one_line());
    Ok(())
}
