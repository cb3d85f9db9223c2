//! # Vocabulary IO
//!
//! Vocabularies are stored one token per line, in id order;
//! each line is a JSON string literal, so tokens may hold any text.
//!
//! ```terminaloutput
//! "<pad>"
//! "<unk>"
//! "hello"
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    errors::{PCResult, PairchipperError},
    types::TokenType,
    vocab::{SpecialTokens, Vocabulary},
};

/// Load a [`Vocabulary`] from a vocab file.
///
/// # Arguments
/// * `path` - the path to the vocabulary file.
/// * `specials` - the reserved tokens the file must contain.
pub fn load_vocab_path<T, P>(
    path: P,
    specials: SpecialTokens,
) -> PCResult<Vocabulary<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    read_vocab(reader, specials)
}

/// Read a [`Vocabulary`] from a line reader.
pub fn read_vocab<T, R>(
    reader: R,
    specials: SpecialTokens,
) -> PCResult<Vocabulary<T>>
where
    T: TokenType,
    R: BufRead,
{
    let mut itos = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let token: String = serde_json::from_str(&line).map_err(|e| {
            PairchipperError::InvalidVocab(format!("line {}: {e}", idx + 1))
        })?;
        itos.push(token);
    }
    Vocabulary::from_itos(specials, itos)
}

/// Save a [`Vocabulary`] to a vocab file.
pub fn save_vocab_path<T, P>(
    vocab: &Vocabulary<T>,
    path: P,
) -> PCResult<()>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write_vocab(vocab, &mut writer)
}

/// Write a [`Vocabulary`] to a [`Write`] writer.
pub fn write_vocab<T, W>(
    vocab: &Vocabulary<T>,
    writer: &mut W,
) -> PCResult<()>
where
    T: TokenType,
    W: Write,
{
    for token in vocab.itos() {
        serde_json::to_writer(&mut *writer, token).map_err(std::io::Error::other)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
