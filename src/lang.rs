//! Language vocabulary.
//!
//! Shards are opened once, at merge stage start, for a known set of language codes.
//! By default this is the set of labels of the fastText `lid.176` model.
use std::collections::BTreeSet;

use lazy_static::lazy_static;

const FASTTEXT_LANGS: &str = "af als am an ar arz as ast av az azb ba bar bcl be bg bh bn bo bpy br bs bxr ca cbk ce ceb ckb co cs cv cy da de diq dsb dty dv el eml en eo es et eu fa fi fr frr fy ga gd gl gn gom gu gv he hi hif hr hsb ht hu hy ia id ie ilo io is it ja jbo jv ka kk km kn ko krc ku kv kw ky la lb lez li lmo lo lrc lt lv mai mg mhr min mk ml mn mr mrj ms mt mwl my myv mzn nah nap nds ne new nl nn no oc or os pa pam pfl pl pms pnb ps pt qu rm ro ru rue sa sah sc scn sco sd sh si sk sl so sq sr su sv sw ta te tg th tk tl tr tt tyv ug uk ur uz vec vep vi vls vo wa war wuu xal xmf yi yo yue zh";

lazy_static! {
    /// Holds langs that are available through the `lid.176` fastText model.
    pub static ref LANG: BTreeSet<&'static str> = FASTTEXT_LANGS.split_whitespace().collect();
}

/// Set of language codes a run writes shards for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    codes: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Add codes to the vocabulary, ignoring already present ones.
    pub fn extend<I, S>(&mut self, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.codes.extend(codes.into_iter().map(Into::into));
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(LANG.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fasttext_labels() {
        assert_eq!(LANG.len(), 176);
        assert!(LANG.contains("en"));
        assert!(LANG.contains("yue"));
        assert!(!LANG.contains("naija"));
    }

    #[test]
    fn extend() {
        let mut v = Vocabulary::default();
        v.extend(["naija", "en"]);
        assert_eq!(v.len(), 177);
        assert!(v.contains("naija"));
    }
}
