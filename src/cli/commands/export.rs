use std::path::PathBuf;

use slip_core::{pause::SAVE_DELAY, CategoryFilter, ExportFormat, ReceiptFilter};
use slip_storage_json::write_file_atomic;

use crate::cli::args::ParsedArgs;
use crate::cli::commands::receipt::parse_category_filter;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

const EXPORT_DIR: &str = "exports";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "export",
        "Write receipts to a JSON or CSV file",
        "export json|csv [--out PATH] [--search TEXT] [--category KEY]",
        cmd_export,
    )
    .with_flags(&["--out", "--search", "--category"])]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["out", "search", "category"], &[])?;
    let [format] = parsed.positional() else {
        return Err(CommandError::InvalidArguments(
            "usage: export json|csv [--out PATH]".into(),
        ));
    };
    let format: ExportFormat = format.parse()?;
    let category = match parsed.value("category") {
        Some(raw) => parse_category_filter(raw)?,
        None => CategoryFilter::All,
    };
    let filter = ReceiptFilter::new(parsed.value("search").unwrap_or_default(), category);

    let file_name = format.file_name(context.today());
    let path = match parsed.value("out") {
        Some(out) => {
            let out = PathBuf::from(out);
            if out.is_dir() {
                out.join(file_name)
            } else {
                out
            }
        }
        None => context.data_dir.join(EXPORT_DIR).join(file_name),
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let receipts = context.repository.filtered(&filter);
    let bytes = format.encode(&receipts)?;
    context.pause.pause(SAVE_DELAY);
    write_file_atomic(&path, &bytes)?;

    tracing::info!(path = %path.display(), count = receipts.len(), %format, "Exported receipts");
    io::print_success(format!(
        "Exported {} receipts as {} to {}",
        receipts.len(),
        format,
        path.display()
    ));
    Ok(())
}
