use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

#[derive(Clone, Copy, Debug)]
enum Segment {
    Field(&'static str),
    Index(usize),
}

/// Location inside the value currently walked, used in error messages.
///
/// Renders as `coverage.tier[0].step_id`; the root renders as `<root>`.
#[derive(Default, Debug)]
pub(crate) struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn push_field(&mut self, name: &'static str) {
        self.segments.push(Segment::Field(name));
    }

    #[inline]
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    #[inline]
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// The current path with `name` appended, without pushing it.
    pub fn child(&self, name: &str) -> String {
        if self.is_root() {
            return name.to_string();
        }
        let mut rendered = self.to_string();
        rendered.push('.');
        rendered.push_str(name);
        rendered
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if index == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(at) => write!(f, "[{at}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FieldPath;

    #[test]
    fn renders_fields_and_indices() {
        let mut path = FieldPath::default();
        assert_eq!(path.to_string(), "<root>");
        assert_eq!(path.child("id"), "id");

        path.push_field("tier");
        path.push_index(0);
        path.push_field("step_id");
        assert_eq!(path.to_string(), "tier[0].step_id");
        assert_eq!(path.child("x"), "tier[0].step_id.x");

        path.pop();
        path.pop();
        assert_eq!(path.to_string(), "tier");
    }
}
