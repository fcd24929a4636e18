use proptest::prelude::*;

use cmdrun::Platform;
use cmdrun::exec::argv::{WINDOWS_INTERPRETER, WINDOWS_ONE_SHOT, build_argv};

fn steps_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z]{1,8}( [a-z0-9]{1,6}){0,2}", 1..6)
}

proptest! {
    #[test]
    fn windows_wrapped_argv_starts_with_interpreter(steps in steps_strategy()) {
        let argv = build_argv(&steps, Platform::Windows, true, None);
        prop_assert_eq!(argv.len(), 3);
        prop_assert_eq!(argv[0].as_str(), WINDOWS_INTERPRETER);
        prop_assert_eq!(argv[1].as_str(), WINDOWS_ONE_SHOT);
        prop_assert_eq!(argv[2].clone(), steps.join(" & "));
    }

    #[test]
    fn windows_unwrapped_argv_omits_interpreter(steps in steps_strategy()) {
        let argv = build_argv(&steps, Platform::Windows, false, None);
        prop_assert!(!argv.iter().any(|a| a == WINDOWS_INTERPRETER || a == WINDOWS_ONE_SHOT));
        prop_assert_eq!(argv[0].clone(), steps[0].clone());
        prop_assert!(argv.len() <= 2);
    }

    #[test]
    fn unix_argv_is_single_shell_invocation(steps in steps_strategy(), wrap in any::<bool>()) {
        let argv = build_argv(&steps, Platform::Unix, wrap, None);
        prop_assert_eq!(argv.len(), 3);
        prop_assert_eq!(argv[0].as_str(), "sh");
        prop_assert_eq!(argv[1].as_str(), "-c");
        prop_assert_eq!(argv[2].clone(), steps.join(" && "));
    }
}
