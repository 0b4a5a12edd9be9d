//! Language profiles and the registry that indexes them.
//!
//! The registry is built once with [`build_registry`] and never mutated
//! afterwards; callers share it by reference or behind an `Arc`.
//!
//! Block order inside a profile matters: the scanner tries blocks in
//! order and the first match wins, so `///` has to come before `//` and a
//! JavaScript regex literal (`/.../`) after both comment forms.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::LexicalBlock;

/// Blocks and file extensions of one language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageProfile {
    /// Lowercase identifier, e.g. `"c++"`.
    pub id: &'static str,
    pub display_name: &'static str,
    /// Lowercase extensions including the leading dot.
    pub extensions: &'static [&'static str],
    /// Matchers in the order they are tried.
    pub blocks: Vec<LexicalBlock>,
}

/// Read-only index of every supported language.
#[derive(Clone, Debug)]
pub struct Registry {
    profiles: Vec<LanguageProfile>,
    by_id: FxHashMap<&'static str, usize>,
    by_extension: FxHashMap<&'static str, usize>,
}

impl Registry {
    /// Index `profiles`. When two profiles share an id or an extension the
    /// one declared first wins.
    pub fn new(profiles: Vec<LanguageProfile>) -> Self {
        let mut by_id = FxHashMap::default();
        let mut by_extension = FxHashMap::default();
        for (idx, profile) in profiles.iter().enumerate() {
            by_id.entry(profile.id).or_insert(idx);
            for ext in profile.extensions {
                by_extension.entry(*ext).or_insert(idx);
            }
        }
        Registry {
            profiles,
            by_id,
            by_extension,
        }
    }

    /// Profile by language id (exact, lowercase).
    pub fn get(&self, id: &str) -> Option<&LanguageProfile> {
        self.by_id.get(id).map(|&idx| &self.profiles[idx])
    }

    /// Profile by extension, including the leading dot (`".go"`).
    /// Matching ignores ASCII case.
    pub fn by_extension(&self, ext: &str) -> Option<&LanguageProfile> {
        let idx = match self.by_extension.get(ext) {
            Some(idx) => *idx,
            None => *self.by_extension.get(ext.to_ascii_lowercase().as_str())?,
        };
        Some(&self.profiles[idx])
    }

    /// Profile for a file, inferred from its extension.
    pub fn for_path(&self, path: impl AsRef<Path>) -> Option<&LanguageProfile> {
        let ext = path.as_ref().extension()?.to_str()?;
        self.by_extension(&format!(".{ext}"))
    }

    /// Every profile, in declaration order.
    pub fn profiles(&self) -> &[LanguageProfile] {
        &self.profiles
    }

    /// Ids of every language, in declaration order.
    pub fn languages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.profiles.iter().map(|profile| profile.id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Build the registry of built-in languages.
pub fn build_registry() -> Registry {
    let profiles = vec![
        profile("c#", "C#", &[".cs"], c_style()),
        profile("c++", "C/C++", &[".h", ".c", ".cpp", ".cxx", ".hpp"], c_style()),
        profile("d", "D", &[".d"], c_style()),
        profile(
            "erlang",
            "Erlang",
            &[".erl", ".hrl"],
            vec![
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::single_line("%"),
            ],
        ),
        profile(
            "go",
            "Go",
            &[".go"],
            vec![
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::raw_string("`", "`"),
                LexicalBlock::single_line("//"),
                block_comment(),
            ],
        ),
        profile(
            "groovy",
            "Groovy",
            &[".groovy"],
            vec![
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::string("'''", "'''", "\\"),
                LexicalBlock::string("'", "'", "\\"),
                LexicalBlock::single_line("//"),
                block_comment(),
            ],
        ),
        profile("java", "Java", &[".java"], c_style()),
        profile("javascript", "JavaScript", &[".js"], javascript()),
        profile(
            "kotlin",
            "Kotlin",
            &[".kt", ".kts"],
            vec![
                LexicalBlock::raw_string("\"\"\"", "\"\"\""),
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::single_line("//"),
                block_comment(),
            ],
        ),
        profile(
            "lua",
            "Lua",
            &[".lua"],
            vec![
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::string("'", "'", "\\"),
                LexicalBlock::multi_line_with_prefix("--[[", "]]", "-"),
                LexicalBlock::single_line("--"),
            ],
        ),
        profile(
            "nim",
            "Nim",
            &[".nim"],
            vec![
                LexicalBlock::RawString {
                    begins: &["r\"", "R\""],
                    quote: "\"",
                },
                LexicalBlock::TripleQuoteFence { fence: "\"\"\"" },
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::multi_line_with_prefix("#[", "]#", "#"),
                LexicalBlock::single_line("#"),
            ],
        ),
        profile(
            "pascal",
            "Pascal",
            &[".pas", ".pp"],
            vec![
                LexicalBlock::DoubledQuoteString { quote: "'" },
                LexicalBlock::DoubledQuoteString { quote: "\"" },
                LexicalBlock::multi_line("{", "}"),
                LexicalBlock::multi_line_with_prefix("(*", "*)", "*"),
            ],
        ),
        profile(
            "perl",
            "Perl",
            &[".perl", ".prl", ".pl"],
            vec![
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::string("'", "'", "\\"),
                LexicalBlock::single_line("#"),
                LexicalBlock::LineAnchored {
                    begin: "=pod",
                    end: "=cut",
                },
            ],
        ),
        profile(
            "php",
            "PHP",
            &[".php"],
            vec![
                LexicalBlock::Heredoc,
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::string("'", "'", "\\"),
                LexicalBlock::single_line("//"),
                LexicalBlock::single_line("#"),
                block_comment(),
            ],
        ),
        profile(
            "python",
            "Python",
            &[".py"],
            vec![
                LexicalBlock::raw_string("\"\"\"", "\"\"\""),
                LexicalBlock::raw_string("'''", "'''"),
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::string("'", "'", "\\"),
                LexicalBlock::single_line("#"),
            ],
        ),
        profile(
            "ruby",
            "Ruby",
            &[".rb"],
            vec![
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::string("'", "'", "\\"),
                LexicalBlock::single_line("#"),
                LexicalBlock::LineAnchored {
                    begin: "=begin",
                    end: "=end",
                },
            ],
        ),
        profile("rust", "Rust", &[".rs"], c_style()),
        profile("scala", "Scala", &[".scala"], c_style()),
        profile(
            "swift",
            "Swift",
            &[".swift"],
            vec![
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::single_line("//"),
                LexicalBlock::NestedComment {
                    begin: "/*",
                    end: "*/",
                    prefix: Some("*"),
                },
            ],
        ),
        profile("typescript", "TypeScript", &[".ts", ".tsx"], javascript()),
        profile(
            "zig",
            "Zig",
            &[".zig"],
            vec![
                LexicalBlock::string("\"", "\"", "\\"),
                LexicalBlock::single_line("///"),
                LexicalBlock::single_line("//"),
            ],
        ),
    ];
    Registry::new(profiles)
}

fn profile(
    id: &'static str,
    display_name: &'static str,
    extensions: &'static [&'static str],
    blocks: Vec<LexicalBlock>,
) -> LanguageProfile {
    LanguageProfile {
        id,
        display_name,
        extensions,
        blocks,
    }
}

const fn block_comment() -> LexicalBlock {
    LexicalBlock::multi_line_with_prefix("/*", "*/", "*")
}

fn c_style() -> Vec<LexicalBlock> {
    vec![
        LexicalBlock::string("\"", "\"", "\\"),
        LexicalBlock::single_line("///"),
        LexicalBlock::single_line("//"),
        block_comment(),
    ]
}

fn javascript() -> Vec<LexicalBlock> {
    vec![
        LexicalBlock::string("\"", "\"", "\\"),
        LexicalBlock::string("'", "'", "\\"),
        LexicalBlock::string("`", "`", "\\"),
        LexicalBlock::single_line("//"),
        block_comment(),
        // Regex literal, after the comment forms that also start with `/`.
        LexicalBlock::string("/", "/", "\\"),
    ]
}
