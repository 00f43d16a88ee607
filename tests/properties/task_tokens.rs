//! Property tests for task token parsing.

use proptest::prelude::*;

use gaedeploy::invocation::{parse_task_token, Task};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: parsing arbitrary input never panics.
    #[test]
    fn property_parse_never_panics(token in ".{0,40}") {
        let _ = parse_task_token(&token);
        let _ = Task::parse(&token);
    }

    /// PROPERTY: escaped separators survive into the value unchanged.
    #[test]
    fn property_escaped_cmd_is_preserved(code in "[a-z0-9 ,=()\\\\]{1,30}") {
        let escaped: String = code
            .chars()
            .flat_map(|c| match c {
                ',' | '=' | '\\' => vec!['\\', c],
                _ => vec![c],
            })
            .collect();

        let task = Task::parse(&format!("shell:cmd={}", escaped)).unwrap();
        match task {
            Task::Shell(args) => prop_assert_eq!(args.cmd, Some(code)),
            other => prop_assert!(false, "unexpected task {:?}", other),
        }
    }
}
