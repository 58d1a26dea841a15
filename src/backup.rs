use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::model::AppState;
use crate::normalize;
use crate::persist::{self, SnapshotDb};

const MANIFEST_ENTRY: &str = "manifest.json";
const STATE_ENTRY: &str = "state/state.json";
pub const BUNDLE_FORMAT_V1: &str = "wellbeing-snapshot-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    pub state: AppState,
}

/// Writes the workspace snapshot as a zip bundle: a manifest carrying the
/// snapshot version and a SHA-256 digest of the state entry, plus the state
/// itself.
pub fn export_snapshot_bundle(
    workspace_path: &Path,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    let db = SnapshotDb::open(workspace_path).context("failed to open workspace snapshot")?;
    let state = persist::load_state(&db);
    let state_json =
        serde_json::to_string_pretty(&state).context("failed to serialize snapshot state")?;

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let exported_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let digest = hex_digest(state_json.as_bytes());
    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "snapshotVersion": normalize::SNAPSHOT_VERSION,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": exported_at,
        "stateSha256": digest,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    zip.start_file(STATE_ENTRY, opts)
        .context("failed to start state entry")?;
    zip.write_all(state_json.as_bytes())
        .context("failed to write state entry")?;

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count: 2,
    })
}

/// Imports a bundle (or a bare legacy `.json` snapshot) into the workspace,
/// normalizing whatever snapshot version it contains. The workspace row is
/// only replaced once the content verified and parsed.
pub fn import_snapshot_bundle(
    in_path: &Path,
    workspace_path: &Path,
) -> anyhow::Result<ImportSummary> {
    let (format_detected, state_json) = if is_zip_file(in_path)? {
        let in_file = File::open(in_path)
            .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
        let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

        let mut manifest_text = String::new();
        archive
            .by_name(MANIFEST_ENTRY)
            .context("bundle missing manifest.json")?
            .read_to_string(&mut manifest_text)
            .context("failed to read manifest.json")?;
        let manifest: serde_json::Value =
            serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
        let format = manifest
            .get("format")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        if format != BUNDLE_FORMAT_V1 {
            return Err(anyhow!("unsupported bundle format: {}", format));
        }

        let mut state_text = String::new();
        archive
            .by_name(STATE_ENTRY)
            .context("bundle missing state/state.json")?
            .read_to_string(&mut state_text)
            .context("failed to read state entry")?;

        if let Some(expected) = manifest.get("stateSha256").and_then(|v| v.as_str()) {
            let actual = hex_digest(state_text.as_bytes());
            if actual != expected {
                return Err(anyhow!(
                    "state digest mismatch: manifest {} != content {}",
                    expected,
                    actual
                ));
            }
        }

        (BUNDLE_FORMAT_V1.to_string(), state_text)
    } else {
        // A bare JSON snapshot from before bundles existed.
        let raw = std::fs::read_to_string(in_path)
            .with_context(|| format!("failed to read snapshot {}", in_path.to_string_lossy()))?;
        ("legacy-json".to_string(), raw)
    };

    let state = normalize::load_or_seed(Some(&state_json));
    let db = SnapshotDb::open(workspace_path).context("failed to open workspace snapshot")?;
    persist::save_state(&db, &state).context("failed to write imported snapshot")?;

    Ok(ImportSummary {
        bundle_format_detected: format_detected,
        state,
    })
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn is_zip_file(path: &Path) -> anyhow::Result<bool> {
    let mut f = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.to_string_lossy()))?;
    let mut sig = [0u8; 4];
    let read = f.read(&mut sig).context("failed to read file signature")?;
    if read < 4 {
        return Ok(false);
    }
    Ok(sig == [0x50, 0x4B, 0x03, 0x04])
}
