//! Derivation of file-name components from dotted metric names.
//!
//! Names follow `arch.region.zone.service.package.instance`; only the first
//! and last segments matter for output paths.

/// Architecture identifier: the first dot-separated segment.
pub fn arch(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Machine identifier: the last dot-separated segment.
pub fn machine(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_name() {
        let name = "netflix.us-east-1.zoneA.edda.store.edda00";
        assert_eq!(arch(name), "netflix");
        assert_eq!(machine(name), "edda00");
    }

    #[test]
    fn test_plain_name_maps_to_itself() {
        assert_eq!(arch("pingpong"), "pingpong");
        assert_eq!(machine("pingpong"), "pingpong");
    }

    #[test]
    fn test_empty_segments_are_kept() {
        assert_eq!(arch(".x."), "");
        assert_eq!(machine(".x."), "");
        assert_eq!(arch(""), "");
    }
}
