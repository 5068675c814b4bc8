use chrono::Utc;

use crate::project::Project;

/// Sequential id generator for slides and elements created during a session.
///
/// Ids look like `slide-<seed>-<n>`. The seed is the session start time, so
/// ids from different sessions do not collide, and [`IdGenerator::next_unused`]
/// skips anything the project already contains. An id handed out once is
/// never produced again by the same generator.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        Self::from_seed(to_base36(millis))
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential id with the given prefix
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", prefix, self.seed, self.count)
    }

    /// Next id that no slide or element of `project` already uses
    pub fn next_unused(&mut self, prefix: &str, project: &Project) -> String {
        loop {
            let id = self.next_id(prefix);
            if !project.uses_id(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{LayoutType, Slide};
    use crate::templates::{template, Template};

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::from_seed("abc");

        assert_eq!(gen.next_id("slide"), "slide-abc-1");
        assert_eq!(gen.next_id("el"), "el-abc-2");
        assert_eq!(gen.seed(), "abc");
    }

    #[test]
    fn test_skips_ids_in_use() {
        let mut project = template(Template::Portfolio);
        project
            .slides
            .push(std::sync::Arc::new(Slide::new("slide-x-1", "taken", LayoutType::Blank)));

        let mut gen = IdGenerator::from_seed("x");
        assert_eq!(gen.next_unused("slide", &project), "slide-x-2");
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
