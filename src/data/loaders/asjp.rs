// asjp.rs - Loader for ASJP-style word list files

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::alphabet::MISSING_WORD;
use crate::data::language::{Corpus, Language};
use crate::error::{LexError, Result};

/// Strip everything but word characters; `!` survives only in first position
fn clean_token(token: &str) -> String {
    token
        .chars()
        .enumerate()
        .filter(|(i, c)| c.is_alphanumeric() || *c == '_' || (*c == '!' && *i == 0))
        .map(|(_, c)| c)
        .collect()
}

/// "NAME{Fam.Genus|...}" -> ("NAME", "Fam")
fn parse_header(line: &str) -> (String, String) {
    let name = line.split('{').next().unwrap_or("").trim().to_string();
    let family = line
        .find('{')
        .map(|open| {
            line[open + 1..]
                .split(|c| c == '.' || c == '|' || c == '}')
                .next()
                .unwrap_or("")
                .to_string()
        })
        .unwrap_or_default();
    (name, family)
}

impl Corpus {
    /// Parse an ASJP list file.
    ///
    /// The concept inventory is read from the `<number> <gloss>` lines that
    /// precede the first language header. Word lists follow the inventory in
    /// ascending concept order; a concept with no usable word line is filled
    /// with the missing marker.
    pub fn parse_asjp(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.trim().lines().collect();
        let headers: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.contains('|'))
            .map(|(i, _)| i)
            .collect();

        let Some(&first_header) = headers.first() else {
            return Err(LexError::Corpus("no language sections found".to_string()));
        };

        let mut glosses = BTreeMap::new();
        for line in &lines[..first_header] {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 2 {
                continue;
            }
            if let Ok(number) = parts[0].parse::<usize>() {
                glosses.insert(number, parts[1].to_string());
            }
        }
        if glosses.is_empty() {
            return Err(LexError::Corpus("concept inventory is empty".to_string()));
        }

        let mut families: BTreeMap<String, Vec<Language>> = BTreeMap::new();
        for (k, &start) in headers.iter().enumerate() {
            let end = headers.get(k + 1).copied().unwrap_or(lines.len());
            let (name, family) = parse_header(lines[start]);

            let mut words: BTreeMap<usize, Vec<String>> = BTreeMap::new();
            // skip the header and the metadata line after it
            for line in lines[start..end].iter().skip(2) {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() <= 3 {
                    continue;
                }
                let Ok(number) = parts[0].parse::<usize>() else {
                    continue;
                };
                let variants: Vec<String> = parts[2..]
                    .iter()
                    .map(|p| clean_token(p))
                    .filter(|w| !w.is_empty())
                    .collect();
                words.insert(number, variants);
            }

            let word_list = glosses
                .keys()
                .map(|number| match words.remove(number) {
                    Some(variants) if !variants.is_empty() => variants,
                    _ => vec![MISSING_WORD.to_string()],
                })
                .collect();

            families
                .entry(family)
                .or_default()
                .push(Language::new(name, word_list));
        }

        Ok(Corpus::new(families, glosses))
    }

    pub fn from_asjp_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LexError::io(path, e))?;
        let corpus = Self::parse_asjp(&text)?;
        println!(
            "✅ Corpus loaded: {} languages in {} families, {} concepts",
            corpus.language_count(),
            corpus.families.len(),
            corpus.glosses.len()
        );
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
1 I
2 you
3 we
GERMAN{IE.GERMANIC|Indo-European,Germanic@Indo-European,Germanic}
 1   52.52   13.40      83000000   wals   deu
1 I\tiS, //
2 you\tdu, //
3 we\tvir, //
DUTCH{IE.GERMANIC|Indo-European,Germanic}
 1   52.37    4.89      22000000   wals   dut
1 I\tik, //
3 we\tvEi, vEiy, //
ZULU{NC.BANTOID|Niger-Congo,Bantoid}
 1  -29.00   31.00      10000000   wals   zul
1 I\t!mina, //
2 you\twe!na, //
";

    #[test]
    fn test_parse_inventory_and_families() {
        let corpus = Corpus::parse_asjp(SAMPLE).unwrap();
        let glosses: Vec<&str> = corpus.glosses.values().map(String::as_str).collect();
        assert_eq!(glosses, vec!["I", "you", "we"]);
        assert_eq!(corpus.families.len(), 2);
        assert_eq!(corpus.families["IE"].len(), 2);
        assert_eq!(corpus.families["NC"][0].name, "ZULU");
    }

    #[test]
    fn test_word_lists_follow_inventory() {
        let corpus = Corpus::parse_asjp(SAMPLE).unwrap();
        let german = &corpus.families["IE"][0];
        assert_eq!(german.name, "GERMAN");
        assert_eq!(german.word_list, vec![vec!["iS"], vec!["du"], vec!["vir"]]);

        // missing concept 2 is filled, every language has every slot
        let dutch = &corpus.families["IE"][1];
        assert_eq!(dutch.word_list[1], vec![MISSING_WORD]);
        assert_eq!(dutch.word_list[2], vec!["vEi", "vEiy"]);
        assert!(corpus.validate().is_ok());
    }

    #[test]
    fn test_clean_token_keeps_leading_click() {
        assert_eq!(clean_token("!mina,"), "!mina");
        assert_eq!(clean_token("we!na,"), "wena");
        assert_eq!(clean_token("//"), "");
        assert_eq!(clean_token("ka~t"), "kat");
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("GERMAN{IE.GERMANIC|Indo-European}"),
            ("GERMAN".to_string(), "IE".to_string())
        );
        assert_eq!(parse_header("X{Oth|other}"), ("X".to_string(), "Oth".to_string()));
    }

    #[test]
    fn test_missing_sections_are_errors() {
        assert!(matches!(Corpus::parse_asjp("1 I\n2 you"), Err(LexError::Corpus(_))));
        assert!(matches!(
            Corpus::parse_asjp("GERMAN{IE.G|x}\nmeta\n1 I iS //"),
            Err(LexError::Corpus(_))
        ));
    }
}
