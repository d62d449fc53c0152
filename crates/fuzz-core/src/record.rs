//! Records of the Job and Result streams.
//!
//! Both streams are JSON Lines. Every line carries a `t` tag: `meta` for the
//! single header record, `op` for job operations and `res` for results.

use crate::reply::{MapKey, Reply};
use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Operation codes, in the wire spelling of the store commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// Bulk hash write
    #[serde(rename = "HMSET")]
    HashWrite,
    /// Bulk hash read
    #[serde(rename = "HMGET")]
    HashRead,
    /// Bulk key write
    #[serde(rename = "MSET")]
    BulkWrite,
    /// Bulk key read
    #[serde(rename = "MGET")]
    BulkRead,
    /// Key deletion
    #[serde(rename = "DEL")]
    Delete,
    /// Key existence check
    #[serde(rename = "EXISTS")]
    Exists,
    /// Key type introspection
    #[serde(rename = "TYPE")]
    Type,
    /// Liveness ping
    #[serde(rename = "PING")]
    Ping,
}

impl Opcode {
    /// Wire name of the opcode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HashWrite => "HMSET",
            Self::HashRead => "HMGET",
            Self::BulkWrite => "MSET",
            Self::BulkRead => "MGET",
            Self::Delete => "DEL",
            Self::Exists => "EXISTS",
            Self::Type => "TYPE",
            Self::Ping => "PING",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of a bulk key write: `{"kvs": [[key, value], ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairArgs {
    pub kvs: Vec<(String, String)>,
}

/// Arguments of key-list operations: `{"keys": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyArgs {
    pub keys: Vec<String>,
}

/// Arguments of a bulk hash write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashWriteArgs {
    pub hash: String,
    pub kvs: Vec<(String, String)>,
}

/// Arguments of a bulk hash read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashReadArgs {
    pub hash: String,
    pub fields: Vec<String>,
}

/// Arguments of a type introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeArgs {
    pub key: String,
}

/// Ping takes no arguments and serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingArgs {}

/// Opcode together with its argument payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Command {
    BulkWrite(PairArgs),
    BulkRead(KeyArgs),
    HashWrite(HashWriteArgs),
    HashRead(HashReadArgs),
    Delete(KeyArgs),
    Exists(KeyArgs),
    Type(TypeArgs),
    Ping(PingArgs),
}

impl Command {
    /// Opcode of this command.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::BulkWrite(_) => Opcode::BulkWrite,
            Self::BulkRead(_) => Opcode::BulkRead,
            Self::HashWrite(_) => Opcode::HashWrite,
            Self::HashRead(_) => Opcode::HashRead,
            Self::Delete(_) => Opcode::Delete,
            Self::Exists(_) => Opcode::Exists,
            Self::Type(_) => Opcode::Type,
            Self::Ping(_) => Opcode::Ping,
        }
    }

    /// Decode the argument payload of the given opcode.
    pub fn from_args(opcode: Opcode, args: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match opcode {
            Opcode::BulkWrite => Self::BulkWrite(serde_json::from_value(args)?),
            Opcode::BulkRead => Self::BulkRead(serde_json::from_value(args)?),
            Opcode::HashWrite => Self::HashWrite(serde_json::from_value(args)?),
            Opcode::HashRead => Self::HashRead(serde_json::from_value(args)?),
            Opcode::Delete => Self::Delete(serde_json::from_value(args)?),
            Opcode::Exists => Self::Exists(serde_json::from_value(args)?),
            Opcode::Type => Self::Type(serde_json::from_value(args)?),
            // Whatever a ping carries is ignored
            Opcode::Ping => Self::Ping(PingArgs {}),
        })
    }
}

/// One operation of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Position in the job, the cross-run correlation key
    pub index: u64,
    /// Opcode and arguments
    pub command: Command,
}

impl Operation {
    pub fn new(index: u64, command: Command) -> Self {
        Self { index, command }
    }

    pub fn opcode(&self) -> Opcode {
        self.command.opcode()
    }
}

impl Serialize for Operation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("i", &self.index)?;
        map.serialize_entry("op", &self.opcode())?;
        map.serialize_entry("args", &self.command)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawOperation {
            i: u64,
            op: Opcode,
            #[serde(default)]
            args: serde_json::Value,
        }

        let raw = RawOperation::deserialize(deserializer)?;
        let command = Command::from_args(raw.op, raw.args)
            .map_err(|e| D::Error::custom(format!("invalid args for {}: {e}", raw.op)))?;
        Ok(Self::new(raw.i, command))
    }
}

/// Header record of a job stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMeta {
    /// Seed text the job was produced from
    pub seed: String,
    /// Number of operations that follow
    pub ops: u64,
    /// Stream format version
    pub ver: u32,
    /// Free-form description
    pub note: String,
}

impl JobMeta {
    /// Current job stream format version.
    pub const VERSION: u32 = 1;
    /// Note written into every produced job.
    pub const NOTE: &'static str = "numeric-string differential fuzz";

    pub fn new(seed: impl Into<String>, ops: u64) -> Self {
        Self {
            seed: seed.into(),
            ops,
            ver: Self::VERSION,
            note: Self::NOTE.to_string(),
        }
    }
}

/// A line of a job stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "lowercase")]
pub enum JobLine {
    Meta(JobMeta),
    Op(Operation),
    /// Any other record kind, skipped by readers
    #[serde(other, skip_serializing)]
    Unknown,
}

/// Header record of a result stream.
///
/// Runners fill in what they know about their environment; every field is
/// optional on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultMeta {
    pub seed: String,
    /// Identifier of the client implementation under test
    pub ext: String,
    #[serde(rename = "runtimeVersion")]
    pub runtime_version: String,
    #[serde(rename = "storeVersion")]
    pub store_version: String,
    pub db: i64,
}

/// Error reported by a runner for a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Error class name
    #[serde(rename = "type")]
    pub kind: String,
    pub msg: String,
    pub code: i64,
}

/// Outcome of one operation as reported by a runner.
///
/// Every field must be present (`ret` and `err` may be `null`) and no other
/// fields are accepted, so a runner that drops or renames a field fails the
/// load instead of being compared as a null reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultRecord {
    #[serde(rename = "i")]
    pub index: u64,
    pub op: Opcode,
    pub ok: bool,
    /// Normalized reply on success
    pub ret: Reply,
    /// Error on failure
    #[serde(deserialize_with = "Option::deserialize")]
    pub err: Option<ErrorDescriptor>,
}

impl ResultRecord {
    /// Successful result carrying a normalized reply.
    pub fn success(index: u64, op: Opcode, ret: Reply) -> Self {
        Self {
            index,
            op,
            ok: true,
            ret,
            err: None,
        }
    }

    /// Failed result.
    pub fn failure(index: u64, op: Opcode, err: ErrorDescriptor) -> Self {
        Self {
            index,
            op,
            ok: false,
            ret: Reply::Null,
            err: Some(err),
        }
    }

    /// View the record as a reply tree, in wire field order.
    pub fn to_reply(&self) -> Reply {
        let err = match &self.err {
            Some(err) => Reply::mapping([
                ("type", Reply::text(&err.kind)),
                ("msg", Reply::text(&err.msg)),
                ("code", Reply::Integer(err.code)),
            ]),
            None => Reply::Null,
        };

        Reply::Mapping(vec![
            (MapKey::from("t"), Reply::text("res")),
            (
                MapKey::from("i"),
                Reply::Integer(i64::try_from(self.index).unwrap_or(i64::MAX)),
            ),
            (MapKey::from("op"), Reply::text(self.op.as_str())),
            (MapKey::from("ok"), Reply::Bool(self.ok)),
            (MapKey::from("ret"), self.ret.clone()),
            (MapKey::from("err"), err),
        ])
    }
}

/// A line of a result stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "lowercase")]
pub enum ResultLine {
    Meta(ResultMeta),
    Res(ResultRecord),
    /// Any other record kind, skipped by readers
    #[serde(other, skip_serializing)]
    Unknown,
}
