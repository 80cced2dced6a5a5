use std::fmt;

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];
const PDF_TYPES: &[&str] = &["application/pdf"];

const MIB: u64 = 1024 * 1024;

/// Fit-inside bounds and JPEG quality for re-encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    Avatar,
    Project,
    Resume,
}

impl UploadKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            UploadKind::Avatar => "avatar",
            UploadKind::Project => "project",
            UploadKind::Resume => "resume",
        }
    }

    pub const fn allowed_mime(self) -> &'static [&'static str] {
        match self {
            UploadKind::Avatar | UploadKind::Project => IMAGE_TYPES,
            UploadKind::Resume => PDF_TYPES,
        }
    }

    pub const fn max_bytes(self) -> u64 {
        match self {
            UploadKind::Avatar => 5 * MIB,
            UploadKind::Project | UploadKind::Resume => 10 * MIB,
        }
    }

    pub const fn optimize(self) -> Option<OptimizeOptions> {
        match self {
            UploadKind::Avatar => Some(OptimizeOptions {
                max_width: 500,
                max_height: 500,
                quality: 85,
            }),
            UploadKind::Project => Some(OptimizeOptions {
                max_width: 1200,
                max_height: 800,
                quality: 80,
            }),
            UploadKind::Resume => None,
        }
    }

    pub const fn folder(self) -> &'static str {
        match self {
            UploadKind::Avatar => "portfolio/avatars",
            UploadKind::Project => "portfolio/projects",
            UploadKind::Resume => "portfolio/resumes",
        }
    }

    /// Remote resource class: images vs. opaque files.
    pub const fn resource_type(self) -> &'static str {
        match self {
            UploadKind::Avatar | UploadKind::Project => "image",
            UploadKind::Resume => "raw",
        }
    }

    pub fn accepts(self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_mime().contains(&essence.as_str())
    }

    /// `<kind>_<md5hex>`
    pub fn public_id(self, md5_hex: &str) -> String {
        format!("{}_{}", self.as_str(), md5_hex)
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
