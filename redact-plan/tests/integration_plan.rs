//! End-to-end planning of whole files.
//!
//! These tests exercise the integration of:
//! - field, message and service resolution,
//! - import aliasing and type qualification, and
//! - file-level error collection.

use redact_plan::{
    AccessOptions, ElementRule, FieldAnnotation, FieldDescriptor, FileDescriptor, ImportedFile,
    MessageDescriptor, MessageDisposition, MessageOptions, MessageRule, MethodDescriptor, Options,
    PlanError, Planner, ProtoFileData, ProtoKind, RuleValue, ServiceDescriptor, StatusCode,
    TypeRef,
};

const SELF_PATH: &str = "example.com/acme/users/v1;usersv1";
const COMMON_PATH: &str = "example.com/acme/common/v1;commonv1";

fn local(name: &str) -> TypeRef {
    TypeRef::new(name, format!("acme.users.v1.{name}")).with_import_path(SELF_PATH)
}

fn common(name: &str) -> TypeRef {
    TypeRef::new(name, format!("acme.common.v1.{name}")).with_import_path(COMMON_PATH)
}

fn user() -> MessageDescriptor {
    MessageDescriptor::new(local("User"))
        .field(FieldDescriptor::new("Username", ProtoKind::String))
        .field(FieldDescriptor::new("Password", ProtoKind::String).annotated(FieldAnnotation::redact()))
        .field(
            FieldDescriptor::new("Scores", ProtoKind::Int32)
                .repeated()
                .annotated(FieldAnnotation::custom(RuleValue::Element(ElementRule::nested()))),
        )
        .field(FieldDescriptor::message("Profile", local("Profile")).annotated(FieldAnnotation::redact()))
        .field(
            FieldDescriptor::message("Config", local("Config"))
                .annotated(FieldAnnotation::custom(RuleValue::Message(MessageRule::skip()))),
        )
        .field(
            FieldDescriptor::message("Balance", common("Money"))
                .annotated(FieldAnnotation::custom(RuleValue::Message(MessageRule::empty()))),
        )
}

fn user_file() -> FileDescriptor {
    FileDescriptor {
        name: "acme/users/v1/user.proto".into(),
        package: "usersv1".into(),
        import_path: SELF_PATH.into(),
        imports: vec![ImportedFile {
            import_path: COMMON_PATH.into(),
            package_name: "commonv1".into(),
            first_symbol: Some(common("Money")),
        }],
        messages: vec![user(), MessageDescriptor::new(local("Profile"))],
        services: vec![ServiceDescriptor::new("UserService", "acme.users.v1.UserService")
            .with_options(AccessOptions {
                internal: true,
                ..AccessOptions::default()
            })
            .method(MethodDescriptor::unary(
                "GetUser",
                "acme.users.v1.UserService.GetUser",
                local("GetUserRequest"),
                user(),
            ))],
        ..FileDescriptor::default()
    }
}

fn plan(file: &FileDescriptor) -> ProtoFileData {
    Planner::default().plan_file(file).unwrap().unwrap()
}

#[test]
fn test_password_scenario() {
    let data = plan(&user_file());
    let password = &data.messages[0].fields[1];
    assert_eq!(password.name, "Password");
    assert!(password.redact);
    assert_eq!(password.redaction_value.as_deref(), Some("\"REDACTED\""));
}

#[test]
fn test_scores_scenario() {
    let data = plan(&user_file());
    let scores = &data.messages[0].fields[2];
    assert!(scores.iterate);
    assert!(scores.is_repeated);
    assert_eq!(scores.redaction_value.as_deref(), Some("0"));
}

#[test]
fn test_profile_scenario() {
    let data = plan(&user_file());
    let profile = &data.messages[0].fields[3];
    assert!(profile.nested_call);
    assert!(!profile.embed_skip);
    assert_eq!(profile.embed_message_qualified.as_deref(), Some("Profile"));
}

#[test]
fn test_config_scenario() {
    let data = plan(&user_file());
    let config = &data.messages[0].fields[4];
    assert!(config.embed_skip);
    assert!(!config.nested_call);
}

#[test]
fn test_foreign_types_are_qualified_by_alias() {
    let data = plan(&user_file());
    let balance = &data.messages[0].fields[5];
    assert_eq!(balance.redaction_value.as_deref(), Some("&commonv1.Money{}"));
    assert_eq!(balance.go_type, "*commonv1.Money");
    assert_eq!(data.imports.get("commonv1").map(String::as_str), Some(COMMON_PATH));
    assert!(data.references.contains(&"commonv1.Money".to_string()));
}

#[test]
fn test_default_permission_denied_method() {
    let data = plan(&user_file());
    let method = &data.services[0].methods[0];
    assert!(method.internal);
    assert_eq!(method.status_code, StatusCode::PermissionDenied);
    assert_eq!(method.status_code.code(), 7);
    assert_eq!(
        method.err_message,
        "Permission Denied. Method: \"UserService.GetUser\" has been redacted"
    );
    assert_eq!(method.input, "GetUserRequest");
    assert_eq!(method.output.fields.len(), 6);
}

#[test]
fn test_options_change_inherited_defaults() {
    let planner = Planner::new(
        Options::default()
            .with_default_status_code(StatusCode::NotFound)
            .with_default_error_template("%method% not found"),
    );
    let data = planner.plan_file(&user_file()).unwrap().unwrap();
    let method = &data.services[0].methods[0];
    assert_eq!(method.status_code, StatusCode::NotFound);
    assert_eq!(method.err_message, "GetUser not found");
}

#[test]
fn test_message_dispositions_are_reported() {
    let mut file = user_file();
    file.messages.push(
        MessageDescriptor::new(local("Audit")).with_options(MessageOptions {
            empty: true,
            ..MessageOptions::default()
        }),
    );
    let data = plan(&file);
    assert_eq!(data.messages[2].disposition, Some(MessageDisposition::Empty));
    assert_eq!(data.messages[0].disposition, None);
}

#[test]
fn test_every_failure_in_a_file_is_reported() {
    let mut file = user_file();
    file.messages.push(
        MessageDescriptor::new(local("Broken"))
            .field(
                FieldDescriptor::new("Age", ProtoKind::Int32)
                    .annotated(FieldAnnotation::custom(RuleValue::Int64(1))),
            )
            .field(
                FieldDescriptor::new("Nested", ProtoKind::Int32)
                    .repeated()
                    .annotated(FieldAnnotation::custom(RuleValue::Element(ElementRule::item(
                        RuleValue::Element(ElementRule::empty()),
                    )))),
            ),
    );
    file.messages.push(
        MessageDescriptor::new(local("Conflicted")).with_options(MessageOptions {
            ignored: true,
            nil: true,
            empty: false,
        }),
    );
    file.services.push(
        ServiceDescriptor::new("AdminService", "acme.users.v1.AdminService").with_options(
            AccessOptions {
                internal_code: Some(17),
                ..AccessOptions::default()
            },
        ),
    );

    let err = Planner::default().plan_file(&file).unwrap_err();
    let errors = err.into_vec();
    assert_eq!(errors.len(), 4);
    assert!(matches!(&errors[0], PlanError::TypeMismatch { location, .. } if location == "acme.users.v1.Broken.Age"));
    assert!(matches!(&errors[1], PlanError::NestedDepthExceeded { .. }));
    assert!(matches!(&errors[2], PlanError::ConflictingMessageOptions { .. }));
    assert!(matches!(&errors[3], PlanError::InvalidStatusCode { code: 17, .. }));
}

#[test]
fn test_diagnostics_render_every_error() {
    let mut file = user_file();
    file.messages.push(
        MessageDescriptor::new(local("Broken")).field(
            FieldDescriptor::new("Tags", ProtoKind::String)
                .repeated()
                .annotated(FieldAnnotation::custom(RuleValue::String("x".into()))),
        ),
    );
    let rendered = Planner::default().plan_file(&file).unwrap_err().to_string();
    assert!(rendered.starts_with("[acme.users.v1.Broken.Tags]"));
    assert!(rendered.contains("expected (redact.custom).element.*"));
    assert!(rendered.contains("hint: repeated fields require element rules"));
}
