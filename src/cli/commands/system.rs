use serde_json::Value;
use slip_config::Config;

use crate::cli::args::ParsedArgs;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("version", "Show build information", "version", cmd_version),
    ]
}

pub(crate) fn maintenance_definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "reset",
            "Replace all receipts with the sample data",
            "reset [--all] [--yes]",
            cmd_reset,
        )
        .with_flags(&["--all", "--yes"]),
        CommandEntry::new(
            "settings",
            "Inspect or change stored app settings",
            "settings [key [value]]",
            cmd_settings,
        ),
        CommandEntry::new(
            "config",
            "Inspect or change CLI configuration",
            "config [key [value]]",
            cmd_config,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit).with_aliases(&["quit", "q"]),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => help::print_overview(&context.registry),
        [name] => match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        },
        _ => return Err(CommandError::InvalidArguments("usage: help [command]".into())),
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Slip {}", meta.version));
    io::print_info(format!("  Commit : {}", meta.git_hash));
    io::print_info(format!("  Built  : {}", meta.timestamp));
    io::print_info(format!("  Target : {}", meta.target));
    io::print_info(format!("  Profile: {}", meta.profile));
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["all", "yes"])?;
    if !parsed.positional().is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: reset [--all] [--yes]".into(),
        ));
    }
    let prompt = if parsed.has("all") {
        "Erase all receipts and settings and restore the samples?"
    } else {
        "Replace all receipts with the sample data?"
    };
    if !parsed.has("yes") && !context.confirm(prompt)? {
        io::print_info("Nothing changed.");
        return Ok(());
    }

    if parsed.has("all") {
        context.repository.storage().clear_all();
    }
    context.repository.reset_to_seed()?;
    Ok(())
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let storage = context.repository.storage();
    let mut settings = storage.load_settings();
    match args {
        [] => {
            if settings.is_empty() {
                io::print_info("No settings stored.");
            } else {
                output_section("Settings");
                for (key, value) in &settings {
                    io::print_info(format!("  {key} = {value}"));
                }
            }
        }
        [key] => match settings.get(*key) {
            Some(value) => io::print_info(format!("{key} = {value}")),
            None => io::print_info(format!("`{key}` is not set.")),
        },
        [key, value @ ..] => {
            let raw = value.join(" ");
            let parsed = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw));
            io::print_info(format!("{key} = {parsed}"));
            settings.insert(key.to_string(), parsed);
            if storage.save_settings(&settings) {
                io::print_success("Settings saved.");
            } else {
                io::print_warning("Settings could not be saved.");
            }
        }
    }
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output_section("Configuration");
            for key in Config::KEYS {
                let value = context.config.get(key).unwrap_or_default();
                io::print_info(format!("  {key:<17} {value}"));
            }
            io::print_info(format!(
                "  {:<17} {}",
                "config_file",
                context.config_manager.config_path().display()
            ));
        }
        [key] => match context.config.get(key) {
            Some(value) => io::print_info(format!("{key} = {value}")),
            None => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown config key `{key}` (use one of: {})",
                    Config::KEYS.join(", ")
                )))
            }
        },
        [key, value @ ..] => {
            context.config.set(key, &value.join(" "))?;
            context.persist_config()?;
            context.apply_config();
            io::print_success(format!(
                "{key} = {}",
                context.config.get(key).unwrap_or_default()
            ));
            if *key == "data_dir" {
                io::print_hint("The new data directory is used from the next start.");
            }
        }
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
