//! DTOs for the Identity Toolkit `accounts:lookup` call.

use serde::{Deserialize, Serialize};

use crate::domain::{EmailAddress, ExternalUserId, VerifiedIdentity};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupRequestDto<'a> {
    pub(super) id_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LookupResponseDto {
    #[serde(default)]
    pub(super) users: Vec<AccountDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AccountDto {
    pub(super) local_id: String,
    pub(super) email: Option<String>,
    pub(super) display_name: Option<String>,
}

impl LookupResponseDto {
    pub(super) fn into_identity(self) -> Result<VerifiedIdentity, String> {
        let account = self
            .users
            .into_iter()
            .next()
            .ok_or_else(|| "token does not belong to any account".to_owned())?;
        account.into_identity()
    }
}

impl AccountDto {
    fn into_identity(self) -> Result<VerifiedIdentity, String> {
        let subject_id = ExternalUserId::new(self.local_id)
            .map_err(|err| format!("account id unusable: {err}"))?;
        let email = self
            .email
            .ok_or_else(|| format!("account {subject_id} has no email address"))
            .and_then(|raw| {
                EmailAddress::new(raw).map_err(|err| format!("account email unusable: {err}"))
            })?;
        Ok(VerifiedIdentity {
            subject_id,
            email,
            name: self.display_name.filter(|name| !name.trim().is_empty()),
        })
    }
}
