//! Local mirror inspection. Works on the snapshot files directly, without
//! starting a controller, so clearing is never undone by a shutdown flush.

use serde::Serialize;
use tabled::Tabled;

use apotheca_core::{LocalMirror, MirrorKey, StoreConfig};

use crate::cli::{GlobalOpts, MirrorArgs, MirrorCollection, MirrorCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Clone, Serialize, Tabled)]
struct SnapshotRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Records")]
    records: String,
    #[tabled(rename = "Path")]
    path: String,
}

fn describe(mirror: &LocalMirror, key: MirrorKey) -> SnapshotRow {
    let records = match mirror.load::<serde_json::Value>(key) {
        Ok(Some(records)) => records.len().to_string(),
        Ok(None) => "absent".into(),
        Err(_) => "unreadable".into(),
    };
    SnapshotRow {
        key: key.to_string(),
        records,
        path: mirror.path_for(key).display().to_string(),
    }
}

fn keys(collection: Option<MirrorCollection>) -> Vec<MirrorKey> {
    match collection {
        Some(MirrorCollection::Medicines) => vec![MirrorKey::Medicines],
        Some(MirrorCollection::Diseases) => vec![MirrorKey::Diseases],
        None => vec![MirrorKey::Medicines, MirrorKey::Diseases],
    }
}

pub fn handle(args: MirrorArgs, config: &StoreConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let mirror = LocalMirror::new(&config.data_dir);

    match args.command {
        MirrorCommand::Show => {
            let rows: Vec<SnapshotRow> = keys(None)
                .into_iter()
                .map(|key| describe(&mirror, key))
                .collect();
            let out = output::render_list(
                &global.output,
                &rows,
                SnapshotRow::clone,
                |r| r.path.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MirrorCommand::Clear { collection } => {
            let targets = keys(collection);
            let names: Vec<String> = targets.iter().map(ToString::to_string).collect();
            if !util::confirm(
                &format!("Delete local snapshots {}?", names.join(", ")),
                global.yes,
            )? {
                return Ok(());
            }

            for key in targets {
                if mirror.clear(key)? {
                    output::print_status(&format!("Cleared {key}"), global);
                } else {
                    output::print_status(&format!("{key} was already empty"), global);
                }
            }
            Ok(())
        }
    }
}
