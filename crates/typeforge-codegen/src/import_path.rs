//! Relative import specifiers between output files

/// Directory part of a tree path, `""` for files at the root
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Join a directory and a file name, treating `""` as the root
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Calculates module specifiers a renderer can put into import and export
/// statements
#[derive(Debug, Clone)]
pub struct ImportPathCalculator {
    extension: String,
}

impl ImportPathCalculator {
    /// `extension` is stripped from targets (`.ts` -> `./user.model`)
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Specifier for importing `to` from within `from`
    ///
    /// # Examples
    /// ```
    /// use typeforge_codegen::import_path::ImportPathCalculator;
    ///
    /// let calc = ImportPathCalculator::new(".ts");
    /// assert_eq!(calc.calculate("user/user.model.ts", "user/post.model.ts"), "./post.model");
    /// assert_eq!(
    ///     calc.calculate("user/user-where.input.ts", "prisma/string-filter.input.ts"),
    ///     "../prisma/string-filter.input"
    /// );
    /// assert_eq!(calc.calculate("index.ts", "user/index.ts"), "./user/index");
    /// ```
    pub fn calculate(&self, from: &str, to: &str) -> String {
        let from_dir: Vec<&str> = split_dir(parent_dir(from));
        let target = if self.extension.is_empty() {
            to
        } else {
            to.strip_suffix(self.extension.as_str()).unwrap_or(to)
        };
        let to_parts: Vec<&str> = target.split('/').collect();
        let to_dir = &to_parts[..to_parts.len().saturating_sub(1)];

        let common = from_dir
            .iter()
            .zip(to_dir.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let ups = from_dir.len() - common;

        let mut specifier = if ups == 0 {
            "./".to_string()
        } else {
            "../".repeat(ups)
        };
        specifier.push_str(&to_parts[common..].join("/"));
        specifier
    }
}

fn split_dir(dir: &str) -> Vec<&str> {
    if dir.is_empty() {
        Vec::new()
    } else {
        dir.split('/').collect()
    }
}
