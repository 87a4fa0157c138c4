use std::str::FromStr;

/// Text encoding used by content reads.
///
/// `ReadOptions` keeps this as an `Option`: unset means [`Encoding::Utf8`],
/// while [`Encoding::Raw`] is the explicit "give me bytes" choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8, invalid sequences replaced with U+FFFD.
    #[default]
    Utf8,
    /// ISO-8859-1: every byte is one code point.
    Latin1,
    /// 7-bit ASCII: the high bit of each byte is dropped.
    Ascii,
    /// No decoding.
    Raw,
}

impl Encoding {
    pub fn decode(self, bytes: Vec<u8>) -> FileContent {
        match self {
            Self::Utf8 => match String::from_utf8(bytes) {
                Ok(text) => FileContent::Text(text),
                Err(e) => FileContent::Text(String::from_utf8_lossy(e.as_bytes()).into_owned()),
            },
            Self::Latin1 => FileContent::Text(bytes.into_iter().map(char::from).collect()),
            Self::Ascii => {
                FileContent::Text(bytes.into_iter().map(|b| char::from(b & 0x7f)).collect())
            }
            Self::Raw => FileContent::Bytes(bytes),
        }
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "latin1" | "iso-8859-1" | "binary" => Ok(Self::Latin1),
            "ascii" => Ok(Self::Ascii),
            "raw" | "buffer" => Ok(Self::Raw),
            other => Err(format!("unknown encoding '{other}'")),
        }
    }
}

/// What a content read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Bytes(Vec<u8>),
}

impl FileContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<String> for FileContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for FileContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}
