use crate::cli::commands::receipt::print_receipt_row;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{bar, section as output_section};
use crate::cli::registry::CommandEntry;

const BAR_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Total spending and the category breakdown",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "recent",
            "Most recently recorded receipts",
            "recent [count]",
            cmd_recent,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(CommandError::InvalidArguments("usage: summary".into()));
    }

    let repository = &context.repository;
    output_section("Spending summary");
    io::print_info(format!(
        "  Total spent : {}",
        context.money(repository.total_spending())
    ));
    io::print_info(format!("  Receipts    : {}", repository.len()));
    match repository.top_category() {
        Some((category, amount)) => io::print_info(format!(
            "  Top category: {} ({})",
            category.label(),
            context.money(amount)
        )),
        None => io::print_info("  Top category: -"),
    }

    let shares = repository.category_shares();
    if shares.is_empty() {
        io::print_info("No spending recorded yet.");
        return Ok(());
    }

    output_section("By category");
    for share in shares {
        io::print_info(format!(
            "  {:<18} {} {:>3}%  {:>12}",
            share.category.label(),
            bar(share.percentage, BAR_WIDTH),
            share.percentage,
            context.money(share.amount)
        ));
    }
    Ok(())
}

fn cmd_recent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let count = match args {
        [] => context.config.recent_count,
        [raw] => raw
            .parse::<usize>()
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "`{raw}` is not a positive number of receipts"
                ))
            })?,
        _ => return Err(CommandError::InvalidArguments("usage: recent [count]".into())),
    };

    let recent = context.repository.recent_receipts(count);
    if recent.is_empty() {
        io::print_info("No receipts yet.");
        return Ok(());
    }
    output_section(format!("Recent receipts ({})", recent.len()));
    for receipt in recent {
        print_receipt_row(context, receipt, true);
    }
    Ok(())
}
