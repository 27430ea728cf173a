use serde::{Deserialize, Serialize};

use super::Id;
use crate::presentation::{extension_label, file_icon, is_image, FileIcon};

/// A file attached to a note.
///
/// The payload lists attachments either as bare filenames or as
/// `{id, filename, file_type}` objects; both forms land here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "AttachmentRepr")]
pub struct Attachment {
    pub id: Option<Id>,
    pub filename: String,
    pub file_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AttachmentRepr {
    Name(String),
    Full {
        #[serde(default)]
        id: Option<Id>,
        filename: String,
        #[serde(default)]
        file_type: Option<String>,
    },
}

impl From<AttachmentRepr> for Attachment {
    fn from(repr: AttachmentRepr) -> Self {
        match repr {
            AttachmentRepr::Name(filename) => Attachment::named(&filename),
            AttachmentRepr::Full { id, filename, file_type } => Attachment { id, filename, file_type },
        }
    }
}

impl Attachment {
    pub fn named(filename: &str) -> Self {
        Self {
            id: None,
            filename: filename.to_string(),
            file_type: None,
        }
    }

    pub fn is_image(&self) -> bool {
        is_image(&self.filename)
    }

    pub fn extension_label(&self) -> String {
        extension_label(&self.filename)
    }

    pub fn icon(&self) -> FileIcon {
        file_icon(&self.filename)
    }
}
