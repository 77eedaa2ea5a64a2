//! Persists the signed-in demo session between runs.

use std::fs;
use std::path::{Path, PathBuf};

use relay_core::UserProfile;
use relay_engine::{ensure_output_dir, AtomicFileWriter};
use relay_logging::{relay_error, relay_info, relay_warn};
use serde::{Deserialize, Serialize};

const SESSION_FILENAME: &str = ".relay_session.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    id: String,
    email: String,
    name: String,
}

pub(crate) fn load_session(output_dir: &Path) -> Option<UserProfile> {
    let path = output_dir.join(SESSION_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return None;
        }
        Err(err) => {
            relay_warn!("Failed to read session file {:?}: {}", path, err);
            return None;
        }
    };

    let session: PersistedSession = match ron::from_str(&content) {
        Ok(session) => session,
        Err(err) => {
            relay_warn!("Failed to parse session file {:?}: {}", path, err);
            return None;
        }
    };

    relay_info!("Restored session for {}", session.email);
    Some(UserProfile {
        id: session.id,
        email: session.email,
        name: session.name,
    })
}

pub(crate) fn save_session(output_dir: &Path, profile: &UserProfile) {
    if let Err(err) = ensure_output_dir(output_dir) {
        relay_error!("Failed to ensure output dir {:?}: {}", output_dir, err);
        return;
    }

    let session = PersistedSession {
        id: profile.id.clone(),
        email: profile.email.clone(),
        name: profile.name.clone(),
    };
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&session, pretty) {
        Ok(text) => text,
        Err(err) => {
            relay_error!("Failed to serialize session: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(PathBuf::from(output_dir));
    if let Err(err) = writer.write(SESSION_FILENAME, &content) {
        relay_error!("Failed to write session file to {:?}: {}", output_dir, err);
    }
}
