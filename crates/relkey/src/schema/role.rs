use std::fmt;

/// Structural path identifying a model element within the domain model graph,
/// for example `Order.lines.{key}`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NavigableRole {
    parts: Vec<String>,
}

impl NavigableRole {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            parts: vec![root.into()],
        }
    }

    pub fn append(&self, part: impl Into<String>) -> Self {
        let mut parts = self.parts.clone();
        parts.push(part.into());
        Self { parts }
    }

    /// The role this one was appended to, if any.
    pub fn parent(&self) -> Option<NavigableRole> {
        match &self.parts[..] {
            [_] => None,
            [init @ .., _] => Some(Self {
                parts: init.to_vec(),
            }),
            [] => unreachable!(),
        }
    }

    pub fn root(&self) -> &str {
        &self.parts[0]
    }

    pub fn local_name(&self) -> &str {
        self.parts.last().unwrap()
    }

    pub fn full_path(&self) -> String {
        self.parts.join(".")
    }
}

impl fmt::Display for NavigableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(part)?;
        }
        Ok(())
    }
}

impl fmt::Debug for NavigableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NavigableRole({self})")
    }
}
