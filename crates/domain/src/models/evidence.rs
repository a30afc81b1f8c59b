//! Uploaded evidence media.

use serde::Serialize;
use thiserror::Error;

/// Broad category of an evidence file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
    Audio,
}

/// Errors raised while accepting an upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvidenceError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File is empty: {0}")]
    Empty(String),

    #[error("Corrections must be audio (.mp3, .wav): {0}")]
    NotAudio(String),
}

/// Accepted extensions and their media types.
const ACCEPTED_TYPES: &[(&str, MediaKind, &str)] = &[
    ("mp4", MediaKind::Video, "video/mp4"),
    ("mov", MediaKind::Video, "video/quicktime"),
    ("jpg", MediaKind::Image, "image/jpeg"),
    ("jpeg", MediaKind::Image, "image/jpeg"),
    ("png", MediaKind::Image, "image/png"),
    ("mp3", MediaKind::Audio, "audio/mpeg"),
    ("wav", MediaKind::Audio, "audio/wav"),
];

/// One uploaded evidence file, held in memory for a single generation call.
#[derive(Clone)]
pub struct EvidenceFile {
    file_name: String,
    kind: MediaKind,
    mime_type: &'static str,
    data: Vec<u8>,
}

impl EvidenceFile {
    /// Accepts an upload if its extension is on the allowlist and it has content.
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Result<Self, EvidenceError> {
        let file_name = file_name.into();
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let (_, kind, mime_type) = ACCEPTED_TYPES
            .iter()
            .find(|(ext, _, _)| *ext == extension)
            .copied()
            .ok_or_else(|| EvidenceError::UnsupportedType(file_name.clone()))?;

        if data.is_empty() {
            return Err(EvidenceError::Empty(file_name));
        }

        Ok(Self {
            file_name,
            kind,
            mime_type,
            data,
        })
    }

    /// Accepts an upload that must be an audio clip.
    pub fn audio(file_name: impl Into<String>, data: Vec<u8>) -> Result<Self, EvidenceError> {
        let file = Self::new(file_name, data)?;
        if file.kind != MediaKind::Audio {
            return Err(EvidenceError::NotAudio(file.file_name));
        }
        Ok(file)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Debug for EvidenceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceFile")
            .field("file_name", &self.file_name)
            .field("kind", &self.kind)
            .field("mime_type", &self.mime_type)
            .field("size", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_types() {
        let cases = [
            ("bodycam.mp4", MediaKind::Video, "video/mp4"),
            ("dashcam.MOV", MediaKind::Video, "video/quicktime"),
            ("scene.jpg", MediaKind::Image, "image/jpeg"),
            ("scene.jpeg", MediaKind::Image, "image/jpeg"),
            ("plate.png", MediaKind::Image, "image/png"),
            ("statement.mp3", MediaKind::Audio, "audio/mpeg"),
            ("notes.wav", MediaKind::Audio, "audio/wav"),
        ];
        for (name, kind, mime) in cases {
            let file = EvidenceFile::new(name, vec![1, 2, 3]).unwrap();
            assert_eq!(file.kind(), kind, "{}", name);
            assert_eq!(file.mime_type(), mime, "{}", name);
            assert_eq!(file.file_name(), name);
            assert_eq!(file.size(), 3);
        }
    }

    #[test]
    fn test_rejects_unknown_types() {
        assert_eq!(
            EvidenceFile::new("report.pdf", vec![1]).unwrap_err(),
            EvidenceError::UnsupportedType("report.pdf".to_string())
        );
        assert!(EvidenceFile::new("no_extension", vec![1]).is_err());
        assert!(EvidenceFile::new("archive.mp4.exe", vec![1]).is_err());
    }

    #[test]
    fn test_rejects_empty_files() {
        assert_eq!(
            EvidenceFile::new("empty.wav", Vec::new()).unwrap_err(),
            EvidenceError::Empty("empty.wav".to_string())
        );
    }

    #[test]
    fn test_audio_only() {
        assert!(EvidenceFile::audio("fix.mp3", vec![1]).is_ok());
        assert!(EvidenceFile::audio("fix.wav", vec![1]).is_ok());
        assert_eq!(
            EvidenceFile::audio("fix.mp4", vec![1]).unwrap_err(),
            EvidenceError::NotAudio("fix.mp4".to_string())
        );
    }

    #[test]
    fn test_debug_omits_content() {
        let file = EvidenceFile::new("scene.png", vec![0u8; 2048]).unwrap();
        let debug = format!("{:?}", file);
        assert!(debug.contains("size: 2048"));
        assert!(!debug.contains("data"));
    }
}
