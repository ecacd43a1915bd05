/// A caller may run admin commands with the guild administrator permission
/// or any role listed in the bot settings.
pub fn is_authorized(has_administrator: bool, member_roles: &[u64], admin_roles: &[u64]) -> bool {
    has_administrator || member_roles.iter().any(|role| admin_roles.contains(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_administrator_always_allowed() {
        assert!(is_authorized(true, &[], &[]));
    }

    #[test]
    fn test_role_intersection() {
        assert!(is_authorized(false, &[1, 2, 3], &[3]));
        assert!(!is_authorized(false, &[1, 2], &[3, 4]));
        assert!(!is_authorized(false, &[], &[3]));
    }
}
