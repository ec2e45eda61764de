#![doc(test(attr(deny(warnings))))]

//! Slip keeps a local record of shopping receipts: capture, categorise,
//! summarise and export them from an interactive or scripted shell.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Sets up logging once per process and records which build is running.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(
            version = build.version,
            commit = build.git_hash,
            profile = build.profile,
            "Slip starting"
        );
    });
}
