//! Pure display helpers for attachments and category colors.

/// Alpha used for category tints when none is given.
pub const DEFAULT_TINT_ALPHA: f64 = 0.2;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];

/// Icon category for an attachment, picked from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    Pdf,
    Word,
    Excel,
    PowerPoint,
    Archive,
    Text,
    Audio,
    Video,
    Generic,
}

impl FileIcon {
    /// Icon class used by the web templates.
    pub fn css_class(&self) -> &'static str {
        match self {
            FileIcon::Pdf => "fas fa-file-pdf text-danger",
            FileIcon::Word => "fas fa-file-word text-primary",
            FileIcon::Excel => "fas fa-file-excel text-success",
            FileIcon::PowerPoint => "fas fa-file-powerpoint text-warning",
            FileIcon::Archive => "fas fa-file-archive text-secondary",
            FileIcon::Text => "fas fa-file-alt text-secondary",
            FileIcon::Audio => "fas fa-file-audio text-info",
            FileIcon::Video => "fas fa-file-video text-danger",
            FileIcon::Generic => "fas fa-file",
        }
    }

    /// Single-cell glyph for the terminal.
    pub fn glyph(&self) -> &'static str {
        match self {
            FileIcon::Pdf => "📕",
            FileIcon::Word => "📘",
            FileIcon::Excel => "📗",
            FileIcon::PowerPoint => "📙",
            FileIcon::Archive => "📦",
            FileIcon::Text => "📝",
            FileIcon::Audio => "🎵",
            FileIcon::Video => "🎬",
            FileIcon::Generic => "📄",
        }
    }
}

/// Lowercased text after the last `.`, or the whole name when there is none.
fn raw_extension(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or(filename)
        .to_lowercase()
}

pub fn is_image(filename: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&raw_extension(filename).as_str())
}

/// Extension badge text: lowercased, at most three characters.
pub fn extension_label(filename: &str) -> String {
    raw_extension(filename).chars().take(3).collect()
}

pub fn file_icon(filename: &str) -> FileIcon {
    match raw_extension(filename).as_str() {
        "pdf" => FileIcon::Pdf,
        "doc" | "docx" => FileIcon::Word,
        "xls" | "xlsx" => FileIcon::Excel,
        "ppt" | "pptx" => FileIcon::PowerPoint,
        "zip" | "rar" | "tar" | "gz" => FileIcon::Archive,
        "txt" | "md" | "rtf" => FileIcon::Text,
        "mp3" | "wav" | "ogg" => FileIcon::Audio,
        "mp4" | "avi" | "mov" | "mkv" => FileIcon::Video,
        _ => FileIcon::Generic,
    }
}

/// Channels of a 3- or 6-digit hex color.
///
/// A missing or empty color is white; any other length is black. Digit pairs
/// that fail to parse read as 0.
pub fn hex_to_rgb(hex: Option<&str>) -> (u8, u8, u8) {
    let hex = match hex {
        Some(h) if !h.is_empty() => h.replacen('#', "", 1),
        _ => return (255, 255, 255),
    };
    let channel = |pair: &str| u8::from_str_radix(pair, 16).unwrap_or(0);
    let digits: Vec<char> = hex.chars().collect();

    match digits.len() {
        3 => {
            let doubled: Vec<String> = digits.iter().map(|d| format!("{d}{d}")).collect();
            (channel(&doubled[0]), channel(&doubled[1]), channel(&doubled[2]))
        }
        6 => {
            let pair = |i: usize| digits[i..i + 2].iter().collect::<String>();
            (channel(&pair(0)), channel(&pair(2)), channel(&pair(4)))
        }
        _ => (0, 0, 0),
    }
}

pub fn hex_to_rgba(hex: Option<&str>, alpha: f64) -> String {
    let (r, g, b) = hex_to_rgb(hex);
    format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}
