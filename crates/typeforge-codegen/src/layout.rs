//! Output path patterns
//!
//! A pattern such as `{model}/{name}.{type}.ts` is parsed once per run and
//! rendered for every declaration. Patterns without `{name}` group every
//! declaration rendering to the same path into one file; with `{name}`,
//! two declarations on one path are a collision.

use regex::Regex;
use tracing::debug;
use typeforge_core::naming::{strip_suffix_nonempty, to_kebab_case};
use typeforge_core::{CoreError, GeneratorConfig, ReExport};

use crate::assembly::Declaration;
use crate::error::{CodegenError, CodegenResult};

const TOKEN_PATTERN: &str = r"\{([^{}]*)\}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `{name}`: kebab-case declaration name without its kind suffix
    Name,
    /// `{type}`: `model`, `input`, `output` or `enum`
    Type,
    /// `{plural.type}`
    PluralType,
    /// `{model}`: kebab-case source entity, or the shared directory
    Model,
}

impl Token {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(Token::Name),
            "type" => Some(Token::Type),
            "plural.type" => Some(Token::PluralType),
            "model" => Some(Token::Model),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Token(Token),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl OutputPattern {
    pub fn parse(raw: &str) -> CodegenResult<Self> {
        if raw.trim().is_empty() {
            return Err(CodegenError::invalid_pattern(raw, "pattern is empty"));
        }
        if raw.starts_with('/') {
            return Err(CodegenError::invalid_pattern(raw, "pattern must be relative"));
        }
        if raw.contains('\\') {
            return Err(CodegenError::invalid_pattern(raw, "use '/' as the path separator"));
        }
        for part in raw.split('/') {
            if part.is_empty() || part == "." || part == ".." {
                return Err(CodegenError::invalid_pattern(
                    raw,
                    format!("invalid path segment '{}'", part),
                ));
            }
        }

        let re = Regex::new(TOKEN_PATTERN)
            .map_err(|e| CodegenError::invalid_pattern(raw, e.to_string()))?;

        let mut segments = Vec::new();
        let mut last = 0;
        for caps in re.captures_iter(raw) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_literal(&mut segments, raw, &raw[last..whole.start()])?;
            let token = Token::parse(inner.as_str()).ok_or_else(|| {
                let message = format!("unknown token '{{{}}}'", inner.as_str());
                CodegenError::invalid_pattern(raw, message)
            })?;
            segments.push(Segment::Token(token));
            last = whole.end();
        }
        push_literal(&mut segments, raw, &raw[last..])?;

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn uses(&self, token: Token) -> bool {
        self.segments.contains(&Segment::Token(token))
    }

    /// Extension of the rendered file name (`.ts`), empty when the pattern
    /// ends in a token
    pub fn extension(&self) -> &str {
        match self.segments.last() {
            Some(Segment::Literal(tail)) => {
                let file_part = tail.rsplit('/').next().unwrap_or(tail);
                match file_part.rfind('.') {
                    Some(dot) => &file_part[dot..],
                    None => "",
                }
            }
            _ => "",
        }
    }

    /// File name of every index: `index` plus the pattern's extension
    pub fn index_file_name(&self) -> String {
        format!("index{}", self.extension())
    }

    /// File name part of the pattern when it contains no token
    fn literal_file_name(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Literal(tail)) if tail.contains('/') || self.segments.len() == 1 => {
                tail.rsplit('/').next()
            }
            _ => None,
        }
    }

    pub fn render(&self, declaration: &Declaration, shared_directory: &str) -> String {
        let mut out = String::with_capacity(self.raw.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Token(Token::Name) => {
                    let name = match declaration.name_suffix() {
                        Some(suffix) => strip_suffix_nonempty(declaration.name(), suffix),
                        None => declaration.name(),
                    };
                    out.push_str(&to_kebab_case(name));
                }
                Segment::Token(Token::Type) => out.push_str(declaration.kind_str()),
                Segment::Token(Token::PluralType) => out.push_str(declaration.kind_plural()),
                Segment::Token(Token::Model) => match declaration.source_entity() {
                    Some(entity) => out.push_str(&to_kebab_case(entity)),
                    None => out.push_str(shared_directory),
                },
            }
        }
        out
    }
}

fn push_literal(segments: &mut Vec<Segment>, raw: &str, text: &str) -> CodegenResult<()> {
    if text.is_empty() {
        return Ok(());
    }
    if text.contains('{') || text.contains('}') {
        return Err(CodegenError::invalid_pattern(raw, "unbalanced brace"));
    }
    segments.push(Segment::Literal(text.to_string()));
    Ok(())
}

/// Everything the assembly stage needs to place declarations and indexes
#[derive(Debug, Clone)]
pub struct Layout {
    pub pattern: OutputPattern,
    pub re_export: ReExport,
    pub emit_single: bool,
    pub shared_directory: String,
    pub index_file: String,
}

impl Layout {
    /// Parse the pattern and reject option combinations that cannot produce
    /// a consistent tree
    pub fn from_config(config: &GeneratorConfig) -> CodegenResult<Self> {
        let pattern = OutputPattern::parse(&config.output_file_pattern)?;
        let index_file = pattern.index_file_name();

        // emit_single writes one file, which is the root index itself.
        let re_export = if config.emit_single {
            if config.re_export != ReExport::None {
                debug!("emit_single set, ignoring re_export = {:?}", config.re_export);
            }
            ReExport::None
        } else {
            config.re_export
        };

        let literal_index = pattern.literal_file_name() == Some(index_file.as_str());
        if re_export != ReExport::None && literal_index {
            return Err(CoreError::ConfigurationConflict(format!(
                "output_file_pattern '{}' names every file '{}', \
                 which is reserved for re-export indexes",
                pattern.as_str(),
                index_file
            ))
            .into());
        }

        Ok(Self {
            pattern,
            re_export,
            emit_single: config.emit_single,
            shared_directory: config.shared_directory.clone(),
            index_file,
        })
    }

    /// Whether several declarations may share one file
    pub fn groups_declarations(&self) -> bool {
        self.emit_single || !self.pattern.uses(Token::Name)
    }

    pub fn path_for(&self, declaration: &Declaration) -> String {
        if self.emit_single {
            self.index_file.clone()
        } else {
            self.pattern.render(declaration, &self.shared_directory)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use typeforge_core::{EnumDefinition, TypeDefinition, TypeKind};

    fn model(name: &str) -> Declaration {
        Declaration::Type(TypeDefinition::new(name, TypeKind::Model).with_source(name))
    }

    fn shared_input(name: &str) -> Declaration {
        Declaration::Type(TypeDefinition::new(name, TypeKind::Input))
    }

    #[test]
    fn test_type_directory_pattern() {
        let pattern = OutputPattern::parse("data/{type}/{name}.ts").unwrap();
        assert_eq!(pattern.render(&model("User"), "prisma"), "data/model/user.ts");
        assert_eq!(pattern.extension(), ".ts");
        assert_eq!(pattern.index_file_name(), "index.ts");
    }

    #[test]
    fn test_default_pattern() {
        let pattern = OutputPattern::parse("{model}/{name}.{type}.ts").unwrap();
        let input = Declaration::Type(
            TypeDefinition::new("UserWhereInput", TypeKind::Input).with_source("User"),
        );
        assert_eq!(pattern.render(&input, "prisma"), "user/user-where.input.ts");
        assert_eq!(
            pattern.render(&shared_input("StringFilter"), "prisma"),
            "prisma/string-filter.input.ts"
        );
        assert_eq!(
            pattern.render(&Declaration::Enum(EnumDefinition::new("SortOrder", ["asc"])), "prisma"),
            "prisma/sort-order.enum.ts"
        );
    }

    #[test]
    fn test_plural_and_grouping_tokens() {
        let pattern = OutputPattern::parse("{plural.type}/{model}.ts").unwrap();
        assert!(pattern.uses(Token::PluralType));
        assert!(!pattern.uses(Token::Name));
        assert_eq!(pattern.render(&model("BlogPost"), "shared"), "models/blog-post.ts");
    }

    #[test]
    fn test_pattern_without_extension() {
        let pattern = OutputPattern::parse("{model}/{name}").unwrap();
        assert_eq!(pattern.extension(), "");
        assert_eq!(pattern.index_file_name(), "index");
    }

    #[test]
    fn test_invalid_patterns() {
        for raw in [
            "",
            "/abs/{name}.ts",
            "../{name}.ts",
            "a//{name}.ts",
            "{unknown}.ts",
            "{name.ts",
            "win\\{name}.ts",
        ] {
            assert!(
                matches!(OutputPattern::parse(raw), Err(CodegenError::InvalidPattern { .. })),
                "pattern {:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_literal_index_name_conflicts_with_re_exports() {
        let config = GeneratorConfig {
            output_file_pattern: "{model}/index.ts".to_string(),
            ..Default::default()
        };
        let err = Layout::from_config(&config).unwrap_err();
        assert!(matches!(
            err.core_error(),
            Some(CoreError::ConfigurationConflict(_))
        ));

        let no_indexes = GeneratorConfig {
            re_export: ReExport::None,
            ..config
        };
        assert!(Layout::from_config(&no_indexes).is_ok());
    }

    #[test]
    fn test_emit_single_targets_root_index() {
        let config = GeneratorConfig {
            emit_single: true,
            ..Default::default()
        };
        let layout = Layout::from_config(&config).unwrap();
        assert_eq!(layout.re_export, ReExport::None);
        assert_eq!(layout.path_for(&model("User")), "index.ts");
        assert!(layout.groups_declarations());
    }

    #[test]
    fn test_grouping_follows_name_token() {
        let per_name = Layout::from_config(&GeneratorConfig::default()).unwrap();
        assert!(!per_name.groups_declarations());

        let grouped = GeneratorConfig {
            output_file_pattern: "{model}.ts".to_string(),
            ..Default::default()
        };
        assert!(Layout::from_config(&grouped).unwrap().groups_declarations());
    }
}
