//! Job producer: the stateful operation generator.

use crate::generators::{generate_numeric_string, generate_value};
use crate::options::ProducerOptions;
use crate::registry::KnownRegistry;
use fuzz_core::{
    Command, DeterministicRng, HashReadArgs, HashWriteArgs, Job, JobLine, JobMeta, KeyArgs, Opcode,
    Operation, PairArgs, PingArgs, RngError, TypeArgs,
};
use indexmap::IndexSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Error type for job generation.
///
/// Generation errors are configuration defects: continuing past one would
/// break the determinism guarantee, so every one of them aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A draw failed, e.g. a pick from an empty pool
    #[error("Draw failed: {0}")]
    Rng(#[from] RngError),

    /// Options that can never produce a job
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The generator keeps repeating itself and cannot fill a pool
    #[error("Pool '{pool}' stalled at {found} of {target} distinct entries after {attempts} draws")]
    PoolStalled {
        pool: &'static str,
        found: usize,
        target: usize,
        attempts: usize,
    },

    /// Error writing the job stream
    #[error("Failed to write job: {0}")]
    Io(#[from] std::io::Error),

    /// Error encoding a record
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Opcode weights. The order is part of the draw contract.
const OPCODE_WEIGHTS: [(Opcode, u32); 8] = [
    (Opcode::HashWrite, 25),
    (Opcode::HashRead, 25),
    (Opcode::BulkWrite, 20),
    (Opcode::BulkRead, 20),
    (Opcode::Delete, 5),
    (Opcode::Exists, 3),
    (Opcode::Type, 1),
    (Opcode::Ping, 1),
];

/// Deletes never name more keys than this.
const DELETE_MAX_KEYS: u32 = 16;
const EXISTS_MAX_KEYS: i64 = 8;

/// Draws allowed per requested pool entry before a pool counts as stalled.
const POOL_ATTEMPTS_PER_ENTRY: usize = 1000;

/// Candidate pools, built once before any operation is generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pools {
    pub keys: Vec<String>,
    pub hashes: Vec<String>,
    pub fields: Vec<String>,
    pub values: Vec<String>,
}

type StringGenerator = fn(&mut DeterministicRng) -> Result<String, RngError>;

/// Draw candidates until `target` distinct ones are collected.
///
/// Pool order is the order of first acceptance.
fn build_pool(
    pool: &'static str,
    target: usize,
    rng: &mut DeterministicRng,
    generate: StringGenerator,
) -> Result<Vec<String>, GeneratorError> {
    let mut entries = IndexSet::with_capacity(target);
    let max_attempts = target.saturating_mul(POOL_ATTEMPTS_PER_ENTRY);
    let mut attempts = 0;

    while entries.len() < target {
        if attempts >= max_attempts {
            return Err(GeneratorError::PoolStalled {
                pool,
                found: entries.len(),
                target,
                attempts,
            });
        }
        entries.insert(generate(rng)?);
        attempts += 1;
    }

    debug!(
        "Built {} pool with {} entries after {} draws",
        pool, target, attempts
    );
    Ok(entries.into_iter().collect())
}

/// Deterministic producer of fuzzing jobs.
///
/// Everything it emits is a pure function of the options: the RNG is derived
/// from the seed text, the pools are drawn first, then every operation draws
/// its opcode and arguments in a fixed order. The known-key registry lives and
/// dies with one producer.
pub struct JobProducer {
    options: ProducerOptions,
    rng: DeterministicRng,
    pools: Pools,
    registry: KnownRegistry,
    /// Index of the next operation
    index: u64,
}

impl JobProducer {
    /// Create a producer, drawing all four pools.
    pub fn new(options: ProducerOptions) -> Result<Self, GeneratorError> {
        validate(&options)?;

        let mut rng = DeterministicRng::from_seed_text(&options.seed);
        let pools = Pools {
            keys: build_pool("keys", options.keyspace, &mut rng, generate_numeric_string)?,
            hashes: build_pool("hashes", options.hashspace, &mut rng, generate_numeric_string)?,
            fields: build_pool("fields", options.fields, &mut rng, generate_numeric_string)?,
            values: build_pool("values", options.values, &mut rng, generate_value)?,
        };

        Ok(Self {
            options,
            rng,
            pools,
            registry: KnownRegistry::new(),
            index: 0,
        })
    }

    /// Metadata record of the job.
    pub fn meta(&self) -> JobMeta {
        JobMeta::new(self.options.seed.clone(), self.options.ops)
    }

    pub fn options(&self) -> &ProducerOptions {
        &self.options
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn registry(&self) -> &KnownRegistry {
        &self.registry
    }

    /// Index of the next operation.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    /// Generate the next operation.
    pub fn next_operation(&mut self) -> Result<Operation, GeneratorError> {
        let opcode = *self.rng.weighted(&OPCODE_WEIGHTS)?;
        let command = match opcode {
            Opcode::HashWrite => self.hash_write()?,
            Opcode::HashRead => self.hash_read()?,
            Opcode::BulkWrite => self.bulk_write()?,
            Opcode::BulkRead => Command::BulkRead(KeyArgs {
                keys: self.select_keys(1, i64::from(self.options.max_keys_per_op))?,
            }),
            Opcode::Delete => self.delete()?,
            Opcode::Exists => Command::Exists(KeyArgs {
                keys: self.select_keys(1, EXISTS_MAX_KEYS)?,
            }),
            Opcode::Type => self.type_of()?,
            Opcode::Ping => Command::Ping(PingArgs {}),
        };

        let operation = Operation::new(self.index, command);
        self.index += 1;
        Ok(operation)
    }

    /// Lazily generate the remaining operations of the job.
    pub fn operations(&mut self) -> OperationIterator<'_> {
        let remaining = self.options.ops.saturating_sub(self.index);
        OperationIterator {
            producer: self,
            remaining,
        }
    }

    /// Write the whole job stream: one metadata line, then one line per
    /// operation.
    pub fn produce<W: Write>(mut self, writer: W) -> Result<(), GeneratorError> {
        let mut writer = BufWriter::new(writer);
        info!(
            "Producing {} operations for seed {:?}",
            self.options.ops, self.options.seed
        );

        write_line(&mut writer, &JobLine::Meta(self.meta()))?;
        for operation in self.operations() {
            write_line(&mut writer, &JobLine::Op(operation?))?;
        }
        writer.flush()?;

        info!(
            "Job complete: {} operations, {} known keys",
            self.index,
            self.registry.key_count()
        );
        Ok(())
    }

    /// Write the job stream to a file.
    pub fn produce_to_file<P: AsRef<Path>>(self, path: P) -> Result<(), GeneratorError> {
        let file = File::create(path)?;
        self.produce(file)
    }

    /// Generate the whole job in memory.
    pub fn into_job(mut self) -> Result<Job, GeneratorError> {
        let meta = self.meta();
        let operations = self.operations().collect::<Result<Vec<_>, _>>()?;
        Ok(Job { meta, operations })
    }

    fn bulk_write(&mut self) -> Result<Command, GeneratorError> {
        let count = self.rng.next_int(1, i64::from(self.options.max_set_per_op))?;
        let mut kvs: Vec<(String, String)> = Vec::new();

        for _ in 0..count {
            let mut key = self.rng.pick(&self.pools.keys)?.clone();
            if self.rng.chance(self.options.bias.write_reuse) && !kvs.is_empty() {
                key = kvs[self.rng.pick_index(kvs.len())?].0.clone();
            }
            let value = self.rng.pick(&self.pools.values)?.clone();
            self.registry.remember_key(&key);
            kvs.push((key, value));
        }

        Ok(Command::BulkWrite(PairArgs { kvs }))
    }

    fn hash_write(&mut self) -> Result<Command, GeneratorError> {
        let mut hash = self.rng.pick(&self.pools.hashes)?.clone();
        if self.rng.chance(self.options.bias.hash_write_key_confusion) {
            hash = self.rng.pick(&self.pools.keys)?.clone();
        }

        let count = self.rng.next_int(1, i64::from(self.options.max_set_per_op))?;
        let mut kvs: Vec<(String, String)> = Vec::new();

        for _ in 0..count {
            let mut field = self.rng.pick(&self.pools.fields)?.clone();
            if self.rng.chance(self.options.bias.write_reuse) && !kvs.is_empty() {
                field = kvs[self.rng.pick_index(kvs.len())?].0.clone();
            }
            let value = self.rng.pick(&self.pools.values)?.clone();
            self.registry.remember_hash_field(&hash, &field);
            kvs.push((field, value));
        }

        Ok(Command::HashWrite(HashWriteArgs { hash, kvs }))
    }

    fn hash_read(&mut self) -> Result<Command, GeneratorError> {
        let mut hash = self.rng.pick(&self.pools.hashes)?.clone();
        if self.rng.chance(self.options.bias.hash_read_key_confusion) {
            hash = self.rng.pick(&self.pools.keys)?.clone();
        }

        let fields = self.select_fields(&hash, 1, i64::from(self.options.max_fields_per_op))?;
        Ok(Command::HashRead(HashReadArgs { hash, fields }))
    }

    fn delete(&mut self) -> Result<Command, GeneratorError> {
        let max = self.options.max_set_per_op.min(DELETE_MAX_KEYS);
        let keys = self.select_keys(1, i64::from(max))?;
        for key in &keys {
            self.registry.forget(key);
        }
        Ok(Command::Delete(KeyArgs { keys }))
    }

    fn type_of(&mut self) -> Result<Command, GeneratorError> {
        let known = self.registry.key_count();
        let key = if self.rng.chance(self.options.bias.type_known_key) && known > 0 {
            self.known_key(known)?
        } else {
            self.rng.pick(&self.pools.keys)?.clone()
        };
        Ok(Command::Type(TypeArgs { key }))
    }

    fn known_key(&mut self, known: usize) -> Result<String, GeneratorError> {
        let index = self.rng.pick_index(known)?;
        // pick_index stays below key_count
        Ok(self.registry.key_at(index).unwrap_or_default().to_string())
    }

    /// Biased key selection: known keys, then the key pool, then fresh
    /// candidates that are almost certainly absent from the store.
    fn select_keys(&mut self, min: i64, max: i64) -> Result<Vec<String>, GeneratorError> {
        let bias = &self.options.bias;
        let (known_below, pool_below) = (
            bias.known_key_percent,
            bias.known_key_percent + bias.pool_key_percent,
        );
        let duplicate = bias.key_duplicate;

        let count = self.rng.next_int(min, max)?;
        let mut keys: Vec<String> = Vec::new();

        for _ in 0..count {
            let kind = self.rng.next_int(0, 99)?;
            let known = self.registry.key_count();
            let key = if kind < known_below && known > 0 {
                self.known_key(known)?
            } else if kind < pool_below {
                self.rng.pick(&self.pools.keys)?.clone()
            } else {
                generate_numeric_string(&mut self.rng)?
            };
            keys.push(key);

            if self.rng.chance(duplicate) && !keys.is_empty() {
                let repeated = keys[self.rng.pick_index(keys.len())?].clone();
                keys.push(repeated);
            }
        }

        Ok(keys)
    }

    /// Biased field selection for one hash, same shape as [`Self::select_keys`].
    fn select_fields(
        &mut self,
        hash: &str,
        min: i64,
        max: i64,
    ) -> Result<Vec<String>, GeneratorError> {
        let bias = &self.options.bias;
        let (known_below, pool_below) = (
            bias.known_field_percent,
            bias.known_field_percent + bias.pool_field_percent,
        );
        let duplicate = bias.field_duplicate;

        let count = self.rng.next_int(min, max)?;
        let known: Vec<String> = self
            .registry
            .fields_of(hash)
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut fields: Vec<String> = Vec::new();

        for _ in 0..count {
            let kind = self.rng.next_int(0, 99)?;
            let field = if kind < known_below && !known.is_empty() {
                self.rng.pick(&known)?.clone()
            } else if kind < pool_below {
                self.rng.pick(&self.pools.fields)?.clone()
            } else {
                generate_numeric_string(&mut self.rng)?
            };
            fields.push(field);

            if self.rng.chance(duplicate) && !fields.is_empty() {
                let repeated = fields[self.rng.pick_index(fields.len())?].clone();
                fields.push(repeated);
            }
        }

        Ok(fields)
    }
}

fn validate(options: &ProducerOptions) -> Result<(), GeneratorError> {
    for (name, value) in [
        ("max_keys_per_op", options.max_keys_per_op),
        ("max_fields_per_op", options.max_fields_per_op),
        ("max_set_per_op", options.max_set_per_op),
    ] {
        if value == 0 {
            return Err(GeneratorError::InvalidOptions(format!(
                "{name} must be at least 1"
            )));
        }
    }
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, line: &JobLine) -> Result<(), GeneratorError> {
    serde_json::to_writer(&mut *writer, line)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Iterator that lazily generates operations.
pub struct OperationIterator<'a> {
    producer: &'a mut JobProducer,
    remaining: u64,
}

impl Iterator for OperationIterator<'_> {
    type Item = Result<Operation, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        let next = self.producer.next_operation();
        if next.is_err() {
            // A failed draw leaves the RNG mid-operation; stop here
            self.remaining = 0;
        }
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}
