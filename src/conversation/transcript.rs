use super::message::Role;
use crate::error::TranscriptError;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// One outward-facing formatted response recorded for logging. Distinct from
/// the per-persona histories: the transcript never records the mirrored
/// user/assistant bookkeeping, only what each speaker said.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

impl TranscriptEntry {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Formatted responses accumulated over a run, in chronological order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run facts captured at run start and written into the log header at run
/// end.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub endpoint: String,
    pub models: [String; 2],
    pub system_prompts: [String; 2],
    pub started_at: DateTime<Local>,
}

impl RunMetadata {
    /// Log-file name derived from the run's start timestamp.
    pub fn log_filename(&self) -> String {
        format!(
            "conversation_log_{}.txt",
            self.started_at.format("%Y%m%d_%H%M%S")
        )
    }
}

/// Serialize the run header plus every entry to a flat text file in `dir`.
///
/// One file per run; write-only output with no re-import format. Returns the
/// path written.
pub fn write_log(
    dir: &Path,
    metadata: &RunMetadata,
    transcript: &Transcript,
) -> Result<PathBuf, TranscriptError> {
    let path = dir.join(metadata.log_filename());

    let mut log = String::new();
    let _ = writeln!(
        log,
        "Conversation Log - {}\n",
        metadata.started_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(log, "Ollama Endpoint: {}", metadata.endpoint);
    let _ = writeln!(log, "Model 1: {}", metadata.models[0]);
    let _ = writeln!(log, "Model 2: {}", metadata.models[1]);
    let _ = writeln!(log, "System Prompt 1:\n{}\n", metadata.system_prompts[0]);
    let _ = writeln!(log, "System Prompt 2:\n{}\n", metadata.system_prompts[1]);
    log.push_str("Conversation:\n\n");

    for entry in transcript.entries() {
        let _ = writeln!(
            log,
            "{}:\n{}\n",
            entry.role.to_string().to_uppercase(),
            entry.content
        );
    }

    std::fs::write(&path, &log).map_err(|source| TranscriptError::Write {
        path: path.display().to_string(),
        source,
    })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn metadata() -> RunMetadata {
        RunMetadata {
            endpoint: "http://localhost:11434".into(),
            models: ["llama3".into(), "mistral".into()],
            system_prompts: ["You are concise.".into(), "You are curious.".into()],
            started_at: Local.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap(),
        }
    }

    #[test]
    fn filename_derives_from_start_timestamp() {
        assert_eq!(metadata().log_filename(), "conversation_log_20240309_143005.txt");
    }

    #[test]
    fn log_contains_header_and_entries_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut transcript = Transcript::default();
        transcript.push(TranscriptEntry::assistant("LLAMA3 (AI 1):\nfirst"));
        transcript.push(TranscriptEntry::assistant("MISTRAL (AI 2):\nsecond"));

        let path = write_log(dir.path(), &metadata(), &transcript).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();

        assert!(contents.starts_with("Conversation Log - 2024-03-09 14:30:05"));
        assert!(contents.contains("Ollama Endpoint: http://localhost:11434"));
        assert!(contents.contains("Model 1: llama3"));
        assert!(contents.contains("Model 2: mistral"));
        assert!(contents.contains("System Prompt 1:\nYou are concise."));
        assert!(contents.contains("System Prompt 2:\nYou are curious."));
        assert!(contents.contains("ASSISTANT:\nLLAMA3 (AI 1):\nfirst\n"));
        let first = contents.find("first").unwrap();
        let second = contents.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn empty_transcript_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_log(dir.path(), &metadata(), &Transcript::default()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();

        assert!(contents.contains("Conversation:"));
        assert!(!contents.contains("ASSISTANT:"));
    }

    #[test]
    fn unwritable_directory_is_an_error() {
        let missing = Path::new("/nonexistent-dualmind-dir");
        let err = write_log(missing, &metadata(), &Transcript::default()).unwrap_err();
        assert!(err.to_string().contains("conversation_log_"));
    }
}
