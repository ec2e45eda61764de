use std::path::Path;

use slip_core::{
    form::parse_total,
    format::truncate_text,
    pause::{ANALYZE_DELAY, SAVE_DELAY},
    CategoryFilter, ReceiptFilter, ReceiptForm,
};
use slip_domain::{Category, Receipt, ReceiptPatch};

use crate::cli::args::{split_assignment, ParsedArgs};
use crate::cli::core::{parse_date, short_id, CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::utils::image::{data_uri_from_path, data_uri_payload_len};

const FORM_FLAGS: [&str; 6] = ["store", "total", "category", "date", "notes", "image"];
const FORM_OPTIONS: [&str; 6] = [
    "--store",
    "--total",
    "--category",
    "--date",
    "--notes",
    "--image",
];
const ANALYZE_OPTIONS: [&str; 5] = ["--store", "--total", "--category", "--date", "--notes"];
const STORE_COLUMN_WIDTH: usize = 22;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "list",
            "List receipts, optionally filtered",
            "list [search text] [--category all|food|transport|shopping|utilities|entertainment|other]",
            cmd_list,
        )
        .with_aliases(&["ls"])
        .with_flags(&["--category"]),
        CommandEntry::new("show", "Show one receipt in full", "show <id>", cmd_show)
            .with_aliases(&["view"]),
        CommandEntry::new(
            "add",
            "Record a receipt manually",
            "add --store NAME --total AMOUNT [--category KEY] [--date YYYY-MM-DD] [--notes TEXT] [--image PATH]",
            cmd_add,
        )
        .with_flags(&FORM_OPTIONS),
        CommandEntry::new(
            "analyze",
            "Prefill a receipt from an image",
            "analyze <image-path> [--store NAME] [--total AMOUNT] [--category KEY] [--date YYYY-MM-DD] [--notes TEXT]",
            cmd_analyze,
        )
        .with_aliases(&["scan"])
        .with_flags(&ANALYZE_OPTIONS),
        CommandEntry::new(
            "edit",
            "Change fields of a receipt",
            "edit <id> field=value... (fields: store, total, category, date, notes, image)",
            cmd_edit,
        ),
        CommandEntry::new("delete", "Delete a receipt", "delete <id> [--yes]", cmd_delete)
            .with_aliases(&["rm"])
            .with_flags(&["--yes"]),
    ]
}

pub(crate) fn parse_category(raw: &str) -> Result<Category, CommandError> {
    Category::parse(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown category `{raw}` (use one of: {})",
            category_keys()
        ))
    })
}

pub(crate) fn parse_category_filter(raw: &str) -> Result<CategoryFilter, CommandError> {
    CategoryFilter::parse(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown category `{raw}` (use all or one of: {})",
            category_keys()
        ))
    })
}

fn category_keys() -> String {
    Category::ALL
        .iter()
        .map(|category| category.key())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn print_receipt_row(context: &ShellContext, receipt: &Receipt, relative: bool) {
    let date = if relative {
        context.relative_date(receipt.date)
    } else {
        context.date(receipt.date)
    };
    io::print_info(format!(
        "  {:<8}  {:<14}  {:<22}  {:<18} {:>12}",
        short_id(&receipt.id),
        date,
        truncate_text(&receipt.store_name, STORE_COLUMN_WIDTH),
        receipt.category.label(),
        context.money(receipt.total)
    ));
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["category"], &[])?;
    let category = match parsed.value("category") {
        Some(raw) => parse_category_filter(raw)?,
        None => CategoryFilter::All,
    };
    let filter = ReceiptFilter::new(parsed.positional().join(" "), category);
    let receipts = context.repository.filtered(&filter);

    if receipts.is_empty() {
        if context.repository.is_empty() {
            io::print_info("No receipts yet. Use `add` or `analyze` to record one.");
        } else {
            io::print_info("No receipts match your search.");
        }
        return Ok(());
    }

    output_section(format!("Receipts ({})", receipts.len()));
    for receipt in &receipts {
        print_receipt_row(context, receipt, false);
    }
    let total: f64 = receipts.iter().map(|receipt| receipt.total).sum();
    io::print_info(format!("  Total: {}", context.money(total)));
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw_id] = args else {
        return Err(CommandError::InvalidArguments("usage: show <id>".into()));
    };
    let id = context.resolve_receipt_id(raw_id)?;
    let Some(receipt) = context.repository.get_by_id(&id) else {
        return Err(CommandError::ReceiptNotFound(id));
    };

    output_section(&receipt.store_name);
    io::print_info(format!("  Id       : {}", receipt.id));
    io::print_info(format!(
        "  Date     : {} ({})",
        context.date(receipt.date),
        context.relative_date(receipt.date)
    ));
    io::print_info(format!("  Total    : {}", context.money(receipt.total)));
    io::print_info(format!(
        "  Category : {} ({})",
        receipt.category.label(),
        receipt.category.key()
    ));
    let notes = match receipt.notes_or_empty() {
        "" => "-",
        notes => notes,
    };
    io::print_info(format!("  Notes    : {notes}"));
    if !receipt.items.is_empty() {
        io::print_info("  Items    :");
        for item in &receipt.items {
            io::print_info(format!(
                "    - {:<28} {:>12}",
                item.name,
                context.money(item.price)
            ));
        }
    }
    let image = match receipt.image_url.as_deref() {
        None => "none".to_string(),
        Some(uri) => match data_uri_payload_len(uri) {
            Some(bytes) => format!("attached ({bytes} bytes)"),
            None => "attached".to_string(),
        },
    };
    io::print_info(format!("  Image    : {image}"));
    io::print_info(format!(
        "  Recorded : {}",
        receipt.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &FORM_FLAGS, &[])?;
    if !parsed.positional().is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: add --store NAME --total AMOUNT [--category KEY] [--date YYYY-MM-DD] [--notes TEXT] [--image PATH]".into(),
        ));
    }

    let mut form = ReceiptForm::blank(context.today());
    let image = load_image(parsed.value("image"))?;
    if parsed.has_values() {
        apply_form_flags(&mut form, &parsed)?;
    } else if context.mode == CliMode::Interactive {
        prompt_form(context, &mut form)?;
    } else {
        return Err(CommandError::InvalidArguments(
            "usage: add --store NAME --total AMOUNT [--category KEY]".into(),
        ));
    }
    save_form(context, &form, image)
}

fn cmd_analyze(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &FORM_FLAGS[..5], &[])?;
    let [path] = parsed.positional() else {
        return Err(CommandError::InvalidArguments(
            "usage: analyze <image-path>".into(),
        ));
    };
    let image = data_uri_from_path(Path::new(path)).map_err(|err| {
        CommandError::InvalidArguments(format!("cannot read image `{path}`: {err}"))
    })?;

    io::print_info("Analyzing receipt...");
    context.pause.pause(ANALYZE_DELAY);
    let today = context.today();
    let mut form = context.analyzer.analyze(&image, today);
    apply_form_flags(&mut form, &parsed)?;
    print_form(context, &form);

    if context.mode == CliMode::Interactive {
        let choice = io::select_index(
            &context.theme,
            "Save this receipt?",
            &["Save", "Edit fields first", "Discard"],
            0,
        )?;
        match choice {
            0 => {}
            1 => prompt_form(context, &mut form)?,
            _ => {
                io::print_info("Receipt discarded.");
                return Ok(());
            }
        }
    }
    save_form(context, &form, Some(image))
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((raw_id, assignments)) = args.split_first().filter(|(_, rest)| !rest.is_empty())
    else {
        return Err(CommandError::InvalidArguments(
            "usage: edit <id> field=value...".into(),
        ));
    };
    let id = context.resolve_receipt_id(raw_id)?;

    let mut patch = ReceiptPatch::new();
    for assignment in assignments {
        let (field, value) = split_assignment(assignment)?;
        patch = match field.to_ascii_lowercase().as_str() {
            "store" | "store_name" => {
                let store = value.trim();
                if store.is_empty() {
                    return Err(CommandError::InvalidArguments(
                        "store name cannot be empty".into(),
                    ));
                }
                patch.store_name(store)
            }
            "total" => patch.total(parse_total(value)?),
            "category" => patch.category(parse_category(value)?),
            "date" => patch.date(parse_date(value)?),
            "notes" => patch.notes(Some(value.trim().to_string()).filter(|notes| !notes.is_empty())),
            "image" if value.is_empty() || value.eq_ignore_ascii_case("none") => {
                patch.image_url(None)
            }
            "image" => patch.image_url(load_image(Some(value))?),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{other}` (use store, total, category, date, notes, image)"
                )))
            }
        };
    }

    context.pause.pause(SAVE_DELAY);
    match context.repository.update(&id, patch)? {
        Some(_) => Ok(()),
        None => Err(CommandError::ReceiptNotFound(id)),
    }
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    let [raw_id] = parsed.positional() else {
        return Err(CommandError::InvalidArguments(
            "usage: delete <id> [--yes]".into(),
        ));
    };
    let id = context.resolve_receipt_id(raw_id)?;
    let store = context
        .repository
        .get_by_id(&id)
        .map(|receipt| receipt.store_name.clone())
        .unwrap_or_default();

    if !parsed.has("yes") && !context.confirm(&format!("Delete the receipt from {store}?"))? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    context.repository.delete(&id)?;
    Ok(())
}

fn load_image(path: Option<&str>) -> Result<Option<String>, CommandError> {
    let Some(path) = path else {
        return Ok(None);
    };
    data_uri_from_path(Path::new(path))
        .map(Some)
        .map_err(|err| CommandError::InvalidArguments(format!("cannot read image `{path}`: {err}")))
}

fn apply_form_flags(form: &mut ReceiptForm, parsed: &ParsedArgs) -> Result<(), CommandError> {
    if let Some(store) = parsed.value("store") {
        form.store_name = store.to_string();
    }
    if let Some(total) = parsed.value("total") {
        form.total = total.to_string();
    }
    if let Some(category) = parsed.value("category") {
        form.category = parse_category(category)?;
    }
    if let Some(date) = parsed.value("date") {
        form.date = date.to_string();
    }
    if let Some(notes) = parsed.value("notes") {
        form.notes = notes.to_string();
    }
    Ok(())
}

fn prompt_form(context: &ShellContext, form: &mut ReceiptForm) -> Result<(), CommandError> {
    let theme = &context.theme;
    form.store_name = io::prompt_text(theme, "Store name", &form.store_name)?;
    form.total = io::prompt_text(
        theme,
        &format!("Total ({})", context.config.currency_symbol),
        &form.total,
    )?;
    let labels: Vec<&str> = Category::ALL.iter().map(|category| category.label()).collect();
    let current = Category::ALL
        .iter()
        .position(|category| *category == form.category)
        .unwrap_or(0);
    form.category = Category::ALL[io::select_index(theme, "Category", &labels, current)?];
    form.date = io::prompt_text(theme, "Date (YYYY-MM-DD)", &form.date)?;
    form.notes = io::prompt_text(theme, "Notes", &form.notes)?;
    Ok(())
}

fn print_form(context: &ShellContext, form: &ReceiptForm) {
    output_section("Detected details");
    io::print_info(format!("  Store    : {}", form.store_name));
    let total = parse_total(&form.total)
        .map(|amount| context.money(amount))
        .unwrap_or_else(|_| form.total.clone());
    io::print_info(format!("  Total    : {total}"));
    io::print_info(format!("  Category : {}", form.category.label()));
    io::print_info(format!("  Date     : {}", form.date));
    io::print_info(format!("  Notes    : {}", form.notes));
}

fn save_form(
    context: &mut ShellContext,
    form: &ReceiptForm,
    image: Option<String>,
) -> CommandResult {
    let draft = form.validate(image)?;
    context.pause.pause(SAVE_DELAY);
    context.repository.add(draft)?;
    Ok(())
}
