//! Columns and their on-disk size

use super::{Id, Node, Table};
use serde::{Deserialize, Serialize};

/// Leftover-digit byte counts for packed DECIMAL storage
const DECIMAL_LEFTOVER_BYTES: [u64; 9] = [0, 1, 1, 2, 2, 3, 3, 4, 4];

/// A column of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub information_schema: ColumnInformationSchema,
    pub(crate) table: Id<Table>,
}

impl Column {
    /// Bytes one value of this column occupies in a row or index entry
    pub fn storage_byte_size(&self) -> u64 {
        self.information_schema.storage_byte_size()
    }
}

impl<'a> Node<'a, Column> {
    /// Owning table
    pub fn table(&self) -> Node<'a, Table> {
        Node::new(self.database(), self.get().table)
    }

    /// `schema.table.column`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table().qualified_name(), self.name)
    }
}

/// `information_schema.COLUMNS` row for a column
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnInformationSchema {
    /// Bare type name, e.g. `varchar`
    pub data_type: String,

    /// Full type, e.g. `varchar(64)` or `enum('a','b')`
    pub column_type: String,

    pub is_nullable: bool,

    /// Length in characters for string types, bytes for binary types
    pub character_maximum_length: Option<u64>,

    pub numeric_precision: Option<u64>,

    pub numeric_scale: Option<u64>,

    /// Fractional seconds precision for temporal types
    pub datetime_precision: Option<u64>,

    pub character_set_name: Option<String>,

    /// `PRI`, `UNI`, `MUL` or empty
    pub column_key: String,

    /// e.g. `auto_increment`
    pub extra: String,

    pub ordinal_position: u32,
}

impl ColumnInformationSchema {
    /// Record for a NOT NULL column of the given type
    pub fn new(data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        Self {
            column_type: data_type.clone(),
            data_type,
            ..Self::default()
        }
    }

    pub fn with_column_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = column_type.into();
        self
    }

    pub fn with_character_length(mut self, length: u64) -> Self {
        self.character_maximum_length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u64, scale: u64) -> Self {
        self.numeric_precision = Some(precision);
        self.numeric_scale = Some(scale);
        self
    }

    pub fn with_datetime_precision(mut self, precision: u64) -> Self {
        self.datetime_precision = Some(precision);
        self
    }

    pub fn with_character_set(mut self, character_set: impl Into<String>) -> Self {
        self.character_set_name = Some(character_set.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    /// Storage requirement of one value in bytes
    ///
    /// Variable-length types count their declared maximum plus the length
    /// prefix. The NULL bitmap is per row, so nullability adds nothing here.
    /// Unknown types count as zero. Absurd declared lengths saturate at
    /// `u64::MAX` rather than wrap.
    pub fn storage_byte_size(&self) -> u64 {
        let length = self.character_maximum_length.unwrap_or(0);
        let fractional = self.datetime_precision.unwrap_or(0).saturating_add(1) / 2;

        match self.data_type.to_ascii_lowercase().as_str() {
            "tinyint" | "bool" | "boolean" => 1,
            "smallint" => 2,
            "mediumint" => 3,
            "int" | "integer" => 4,
            "bigint" => 8,
            "float" => {
                if self.numeric_precision.unwrap_or(0) > 24 {
                    8
                } else {
                    4
                }
            }
            "double" | "double precision" | "real" => 8,
            "decimal" | "numeric" | "dec" | "fixed" => decimal_byte_size(
                self.numeric_precision.unwrap_or(10),
                self.numeric_scale.unwrap_or(0),
            ),
            "bit" => self.numeric_precision.unwrap_or(1).saturating_add(7) / 8,
            "year" => 1,
            "date" => 3,
            "time" => fractional.saturating_add(3),
            "datetime" => fractional.saturating_add(5),
            "timestamp" => fractional.saturating_add(4),
            "char" => length.saturating_mul(self.bytes_per_character()),
            "binary" => length,
            "varchar" => with_length_prefix(length.saturating_mul(self.bytes_per_character())),
            "varbinary" => with_length_prefix(length),
            "tinytext" | "tinyblob" => 255 + 1,
            "text" | "blob" => 65_535 + 2,
            "mediumtext" | "mediumblob" => 16_777_215 + 3,
            "longtext" | "longblob" | "json" => 4_294_967_295 + 4,
            "enum" => {
                if count_members(&self.column_type) > 255 {
                    2
                } else {
                    1
                }
            }
            "set" => match (count_members(&self.column_type) + 7) / 8 {
                0 | 1 => 1,
                2 => 2,
                3 => 3,
                4 => 4,
                _ => 8,
            },
            _ => 0,
        }
    }

    /// Maximum bytes one character takes in this column's character set
    fn bytes_per_character(&self) -> u64 {
        match self
            .character_set_name
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("latin1" | "ascii" | "binary" | "latin2" | "cp1250" | "cp1251" | "cp1252") => 1,
            Some("ucs2") => 2,
            Some("utf8" | "utf8mb3") => 3,
            _ => 4,
        }
    }
}

fn with_length_prefix(bytes: u64) -> u64 {
    if bytes <= 255 {
        bytes + 1
    } else {
        bytes.saturating_add(2)
    }
}

/// Packed DECIMAL(M, D): 4 bytes per 9 digits on each side of the point
fn decimal_byte_size(precision: u64, scale: u64) -> u64 {
    let packed = |digits: u64| (digits / 9) * 4 + DECIMAL_LEFTOVER_BYTES[(digits % 9) as usize];
    packed(precision.saturating_sub(scale)).saturating_add(packed(scale))
}

/// Number of quoted members in an `enum(...)` or `set(...)` column type
fn count_members(column_type: &str) -> u64 {
    let Some(open) = column_type.find('(') else {
        return 0;
    };

    let mut count = 0;
    let mut in_quote = false;
    let mut chars = column_type[open + 1..].chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quote) {
            ('\'', false) => {
                in_quote = true;
                count += 1;
            }
            // '' is an escaped quote inside a member
            ('\'', true) if chars.peek() == Some(&'\'') => {
                chars.next();
            }
            ('\'', true) => in_quote = false,
            (')', false) => break,
            _ => {}
        }
    }

    count
}
