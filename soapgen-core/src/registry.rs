use std::collections::HashSet;

/// Hands out collision-free names of the form `<base><suffix><N>`, `N`
/// counting up from 1 per base.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    allocated: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, base: &str, suffix: &str) -> String {
        let mut n = 1usize;
        loop {
            let candidate = format!("{base}{suffix}{n}");
            if self.allocated.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.allocated.contains(name)
    }

    pub fn len(&self) -> usize {
        self.allocated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocated.is_empty()
    }

    pub fn clear(&mut self) {
        self.allocated.clear();
    }
}

/// Resolved fault names already synthesized in the current pass.
#[derive(Debug, Default, Clone)]
pub struct FaultRegistry {
    claimed: HashSet<String>,
}

impl FaultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time a name is claimed, `false` afterwards.
    pub fn claim(&mut self, name: &str) -> bool {
        self.claimed.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }

    pub fn clear(&mut self) {
        self.claimed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_counts_up_per_base() {
        let mut names = NameRegistry::new();
        assert_eq!(names.allocate("a.Ping", "_Adapter"), "a.Ping_Adapter1");
        assert_eq!(names.allocate("a.Ping", "_Adapter"), "a.Ping_Adapter2");
        assert_eq!(names.allocate("a.Pong", "_Adapter"), "a.Pong_Adapter1");
        names.clear();
        assert_eq!(names.allocate("a.Ping", "_Adapter"), "a.Ping_Adapter1");
    }

    #[test]
    fn claim_is_first_wins() {
        let mut faults = FaultRegistry::new();
        assert!(faults.claim("Boom_Exception"));
        assert!(!faults.claim("Boom_Exception"));
        assert!(faults.contains("Boom_Exception"));
    }
}
