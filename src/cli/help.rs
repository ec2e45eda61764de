use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Slip commands");
    for entry in registry.list() {
        let name = match entry.aliases {
            [] => entry.name.to_string(),
            aliases => format!("{} ({})", entry.name, aliases.join(", ")),
        };
        io::print_info(format!("  {name:<16} {}", entry.description));
    }
    io::print_hint("Ids can be shortened to any unique prefix. `help <command>` shows usage.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(entry.name);
    io::print_info(format!("  {}", entry.description));
    io::print_info(format!("  Usage  : {}", entry.usage));
    if !entry.aliases.is_empty() {
        io::print_info(format!("  Aliases: {}", entry.aliases.join(", ")));
    }
    if !entry.flags.is_empty() {
        io::print_info(format!("  Options: {}", entry.flags.join(" ")));
    }
}
