use assert_matches::assert_matches;

use default_backup_tagger::{
    session::ROLE_SESSION_NAME, Config, Error, Invocation, Session, Tag,
};

use crate::common::FakeSts;

const TARGET_ACCOUNT: &str = "111111111111";
const OTHER_ACCOUNT: &str = "999999999999";

fn config() -> Config {
    Config {
        default_tag: Tag::new("DefaultPlan", "Fallback"),
        organization_service_role: Some("OrganizationAccountAccessRole".to_string()),
    }
}

fn invocation(access_role_name: Option<&str>) -> Invocation {
    let mut payload = serde_json::json!({
        "AccountId": TARGET_ACCOUNT,
        "Region": "eu-west-1",
    });
    if let Some(name) = access_role_name {
        payload["AccessRoleName"] = name.into();
    }
    serde_json::from_value(payload).unwrap()
}

#[tokio::test]
async fn same_account_uses_ambient_credentials() -> Result<(), Box<dyn std::error::Error>> {
    let sts = FakeSts::in_account(TARGET_ACCOUNT);

    let session = Session::resolve(&sts, &invocation(Some("BackupAdmin")), &config()).await?;

    assert_matches!(session, Session::Ambient);
    assert!(sts.assume_role_calls.borrow().is_empty());

    Ok(())
}

#[tokio::test]
async fn cross_account_assumes_named_role() -> Result<(), Box<dyn std::error::Error>> {
    let sts = FakeSts::in_account(OTHER_ACCOUNT);

    let session = Session::resolve(&sts, &invocation(Some("BackupAdmin")), &config()).await?;

    assert_eq!(
        session.role_arn(),
        Some("arn:aws:iam::111111111111:role/BackupAdmin")
    );
    assert_eq!(
        sts.assume_role_calls.into_inner(),
        vec![(
            "arn:aws:iam::111111111111:role/BackupAdmin".to_string(),
            ROLE_SESSION_NAME.to_string()
        )]
    );

    Ok(())
}

#[tokio::test]
async fn cross_account_defaults_to_organization_role() -> Result<(), Box<dyn std::error::Error>> {
    let sts = FakeSts::in_account(OTHER_ACCOUNT);

    let session = Session::resolve(&sts, &invocation(None), &config()).await?;

    let credentials = assert_matches!(
        session,
        Session::AssumedRole { role_arn, credentials }
            if role_arn == "arn:aws:iam::111111111111:role/OrganizationAccountAccessRole" => credentials
    );
    assert_eq!(credentials.access_key_id, "ASIAFAKE");

    Ok(())
}

#[tokio::test]
async fn assume_role_failure_is_fatal() {
    let sts = FakeSts {
        fail_assume_role: true,
        ..FakeSts::in_account(OTHER_ACCOUNT)
    };

    let error = Session::resolve(&sts, &invocation(None), &config())
        .await
        .unwrap_err();

    let role_arn = assert_matches!(error, Error::AssumeRole { role_arn, .. } => role_arn);
    assert_eq!(
        role_arn,
        "arn:aws:iam::111111111111:role/OrganizationAccountAccessRole"
    );
    assert_eq!(sts.assume_role_calls.borrow().len(), 1);
}

#[tokio::test]
async fn caller_identity_failure_is_fatal() {
    let sts = FakeSts {
        account_id: Err("ExpiredToken".to_string()),
        ..FakeSts::in_account(OTHER_ACCOUNT)
    };

    let error = Session::resolve(&sts, &invocation(None), &config())
        .await
        .unwrap_err();

    assert_matches!(error, Error::CallerIdentity(_));
    assert!(sts.assume_role_calls.borrow().is_empty());
}

#[tokio::test]
async fn cross_account_needs_a_role_name() {
    let sts = FakeSts::in_account(OTHER_ACCOUNT);
    let config = Config {
        organization_service_role: None,
        ..config()
    };

    let error = Session::resolve(&sts, &invocation(None), &config)
        .await
        .unwrap_err();

    assert_matches!(error, Error::MissingRoleName { account_id } if account_id.as_str() == TARGET_ACCOUNT);
    assert!(sts.assume_role_calls.borrow().is_empty());
}
