/*! Thread-safe language-separated text writer.

Each language of the [Vocabulary] is given a buffered, append-mode file (`<dst>/<lang>.txt`)
wrapped into its own [Mutex].

Writers never see the file handles: the only way in is [LangFiles::append], which writes a
whole paragraph run while holding the language lock, so that runs coming from concurrent
workers are never interleaved.
!*/
use std::{
    collections::{HashMap, HashSet},
    fs::{File, OpenOptions},
    hash::{BuildHasherDefault, Hasher},
    io::{BufWriter, Write},
    path::Path,
    sync::Mutex,
};

use log::{debug, info};
use twox_hash::XxHash64;

use crate::error::Error;
use crate::lang::Vocabulary;

type Fingerprints = HashSet<u64, BuildHasherDefault<XxHash64>>;

struct Shard {
    writer: BufWriter<File>,
    // fingerprints of already written lines, when deduplicating
    seen: Option<Fingerprints>,
}

impl Shard {
    fn is_new(&mut self, line: &str) -> bool {
        match &mut self.seen {
            Some(seen) => {
                let mut hasher = XxHash64::default();
                hasher.write(line.as_bytes());
                seen.insert(hasher.finish())
            }
            None => true,
        }
    }
}

/// Holds one writer per language.
///
/// Be aware that a file per language stays open while the structure is not closed.
pub struct LangFiles {
    shards: HashMap<String, Mutex<Shard>>,
}

impl LangFiles {
    /// Open (creating if needed) a shard for each language of `vocabulary` in `dst`.
    ///
    /// When `dedup` is set, lines already written to a shard during this run are skipped.
    pub fn new(dst: &Path, vocabulary: &Vocabulary, dedup: bool) -> Result<Self, Error> {
        let mut options = OpenOptions::new();
        options.append(true).create(true);

        let mut shards = HashMap::with_capacity(vocabulary.len());
        for lang in vocabulary.iter() {
            let path = dst.join(format!("{}.txt", lang));
            debug!("creating/opening {:?}", path);
            let file = options.open(&path)?;
            let shard = Shard {
                writer: BufWriter::new(file),
                seen: dedup.then(Fingerprints::default),
            };
            shards.insert(lang.to_string(), Mutex::new(shard));
        }

        info!("opened {} language files in {:?}", shards.len(), dst);
        Ok(Self { shards })
    }

    pub fn contains(&self, lang: &str) -> bool {
        self.shards.contains_key(lang)
    }

    /// Append a paragraph run to `lang`'s file: each line followed by a newline,
    /// then a blank line separating it from the next run.
    ///
    /// The run is written under the language lock, in one piece.
    /// Returns the number of lines actually written (see deduplication in [LangFiles::new]).
    ///
    /// # Errors
    /// [Error::UnknownLang] if `lang` is not part of the vocabulary.
    pub fn append<S: AsRef<str>>(&self, lang: &str, lines: &[S]) -> Result<usize, Error> {
        let shard = self
            .shards
            .get(lang)
            .ok_or_else(|| Error::UnknownLang(lang.to_string()))?;

        let mut shard = shard
            .lock()
            .map_err(|_| Error::Custom(format!("{} writer lock is poisoned", lang)))?;

        let mut buf = String::new();
        let mut written = 0;
        for line in lines.iter().map(AsRef::as_ref) {
            if shard.is_new(line) {
                buf.push_str(line);
                buf.push('\n');
                written += 1;
            }
        }

        if written > 0 {
            buf.push('\n');
            shard.writer.write_all(buf.as_bytes())?;
        }

        Ok(written)
    }

    /// Flush and close every language file.
    pub fn close(self) -> Result<(), Error> {
        for (lang, shard) in self.shards {
            let mut shard = shard
                .into_inner()
                .map_err(|_| Error::Custom(format!("{} writer lock is poisoned", lang)))?;
            shard.writer.flush()?;
        }
        Ok(())
    }
}
