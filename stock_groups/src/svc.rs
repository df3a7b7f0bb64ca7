use anyhow::Result;
use identity::jwt::Identity;
use request_http_parser::parser::Request;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::WriteHalf;
use tracing::{error, info};

use crate::constant::{CREATED, OK_RESPONSE};
use crate::error::{GroupError, is_unique_violation};
use crate::group::invite;
use crate::group::model::GroupInfo;
use crate::group::repo::GroupRepo;
use crate::leaderboard::build;
use crate::leaderboard::model::Leaderboard;
use crate::market::client::MarketClient;
use crate::member::position::{self, Position};
use crate::member::repo::MemberRepo;
use crate::utils::{des_from_str, ser_to_str};

#[derive(Serialize, Deserialize, Debug)]
struct Response<T> {
    pub status: String,
    pub message: T,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGroupForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    positions: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinGroupForm {
    #[serde(default)]
    invite_code: String,
    #[serde(default)]
    positions: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaveGroupForm {
    group_id: i32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplacePositionsForm {
    #[serde(default)]
    positions: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinedGroup {
    group_id: i32,
    message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyGroup {
    group: GroupInfo,
    positions: Vec<Position>,
    total_invested: Decimal,
}

#[derive(Clone)]
pub struct Service {
    group_repo: GroupRepo,
    member_repo: MemberRepo,
    market: MarketClient,
}

impl Service {
    pub fn new(group_repo: GroupRepo, member_repo: MemberRepo, market: MarketClient) -> Self {
        Self {
            group_repo,
            member_repo,
            market,
        }
    }

    pub async fn create_group(
        &self,
        request: Request,
        identity: Identity,
        writer: &mut WriteHalf<'_>,
    ) -> Result<()> {
        match self.do_create_group(&request, &identity).await {
            Ok(info) => respond(writer, CREATED, info).await,
            Err(err) => respond_err(writer, &err).await,
        }
    }

    async fn do_create_group(
        &self,
        request: &Request,
        identity: &Identity,
    ) -> Result<GroupInfo, GroupError> {
        let form: CreateGroupForm = parse_body(request)?;

        let name = form.name.trim();
        if name.is_empty() {
            return Err(GroupError::InvalidName);
        }
        if name.chars().count() > 120 {
            return Err(GroupError::NameTooLong);
        }

        let positions = position::parse_and_validate(&form.positions)?;

        // one group per user, system-wide
        if self
            .member_repo
            .find_by_user(&identity.user_id)
            .await?
            .is_some()
        {
            return Err(GroupError::AlreadyMember);
        }

        let group_repo = self.group_repo.clone();
        let invite_code = invite::generate(move |code| {
            let repo = group_repo.clone();
            async move {
                repo.invite_code_exists(&code)
                    .await
                    .map_err(GroupError::from)
            }
        })
        .await?;

        let group = match self
            .group_repo
            .insert(name, &invite_code, &identity.user_id)
            .await
        {
            Ok(group) => group,
            // lost the invite-code race to a concurrent create
            Err(err) if is_unique_violation(&err) => return Err(GroupError::GenerationExhausted),
            Err(err) => return Err(err.into()),
        };

        // a failed member insert leaves the group row in place (tolerated)
        match self
            .member_repo
            .insert(
                group.group_id,
                &identity.user_id,
                &identity.display_name,
                &positions,
            )
            .await
        {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => return Err(GroupError::AlreadyMember),
            Err(err) => return Err(err.into()),
        }

        Ok(GroupInfo::from(&group))
    }

    pub async fn join_group(
        &self,
        request: Request,
        identity: Identity,
        writer: &mut WriteHalf<'_>,
    ) -> Result<()> {
        match self.do_join_group(&request, &identity).await {
            Ok(joined) => respond(writer, CREATED, joined).await,
            Err(err) => respond_err(writer, &err).await,
        }
    }

    async fn do_join_group(
        &self,
        request: &Request,
        identity: &Identity,
    ) -> Result<JoinedGroup, GroupError> {
        let form: JoinGroupForm = parse_body(request)?;

        let invite_code = form.invite_code.trim().to_uppercase();
        if invite_code.is_empty() {
            return Err(GroupError::MissingCode);
        }

        let positions = position::parse_and_validate(&form.positions)?;

        let group = self
            .group_repo
            .find_by_invite_code(&invite_code)
            .await?
            .ok_or(GroupError::GroupNotFound)?;

        if self
            .member_repo
            .find_by_user(&identity.user_id)
            .await?
            .is_some()
        {
            return Err(GroupError::AlreadyMember);
        }

        match self
            .member_repo
            .insert(
                group.group_id,
                &identity.user_id,
                &identity.display_name,
                &positions,
            )
            .await
        {
            Ok(_) => Ok(JoinedGroup {
                group_id: group.group_id,
                message: "Joined group successfully".to_string(),
            }),
            Err(err) if is_unique_violation(&err) => Err(GroupError::AlreadyMember),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn leave_group(
        &self,
        request: Request,
        identity: Identity,
        writer: &mut WriteHalf<'_>,
    ) -> Result<()> {
        match self.do_leave_group(&request, &identity).await {
            Ok(()) => respond(writer, OK_RESPONSE, "Left group successfully".to_string()).await,
            Err(err) => respond_err(writer, &err).await,
        }
    }

    async fn do_leave_group(
        &self,
        request: &Request,
        identity: &Identity,
    ) -> Result<(), GroupError> {
        let form: LeaveGroupForm = parse_body(request)?;

        let group = self
            .group_repo
            .find_by_id(form.group_id)
            .await?
            .ok_or(GroupError::GroupNotFound)?;

        let removed = self
            .member_repo
            .delete(group.group_id, &identity.user_id)
            .await?;
        if !removed {
            return Err(GroupError::NotAMember);
        }
        Ok(())
    }

    pub async fn replace_positions(
        &self,
        request: Request,
        identity: Identity,
        writer: &mut WriteHalf<'_>,
    ) -> Result<()> {
        match self.do_replace_positions(&request, &identity).await {
            Ok(()) => respond(writer, OK_RESPONSE, "Positions updated successfully".to_string()).await,
            Err(err) => respond_err(writer, &err).await,
        }
    }

    async fn do_replace_positions(
        &self,
        request: &Request,
        identity: &Identity,
    ) -> Result<(), GroupError> {
        let form: ReplacePositionsForm = parse_body(request)?;

        let positions = position::parse_and_validate(&form.positions)?;
        if position::has_duplicate_symbols(&positions) {
            return Err(GroupError::DuplicateSymbol);
        }

        let member = self
            .member_repo
            .find_by_user(&identity.user_id)
            .await?
            .ok_or(GroupError::NotAMember)?;

        match self
            .member_repo
            .replace_positions(member.member_id, &positions)
            .await
        {
            Ok(()) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(GroupError::DuplicateSymbol),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get_my_group(&self, identity: Identity, writer: &mut WriteHalf<'_>) -> Result<()> {
        match self.do_get_my_group(&identity).await {
            Ok(mine) => respond(writer, OK_RESPONSE, mine).await,
            Err(err) => respond_err(writer, &err).await,
        }
    }

    async fn do_get_my_group(&self, identity: &Identity) -> Result<MyGroup, GroupError> {
        let member = self
            .member_repo
            .find_by_user(&identity.user_id)
            .await?
            .ok_or(GroupError::NotAMember)?;

        let group = self
            .group_repo
            .find_by_id(member.group_id)
            .await?
            .ok_or(GroupError::GroupNotFound)?;

        let positions = self.member_repo.positions_of(member.member_id).await?;
        let total_invested = positions.iter().map(|p| p.amount_invested).sum();

        Ok(MyGroup {
            group: GroupInfo::from(&group),
            positions,
            total_invested,
        })
    }

    pub async fn get_leaderboard(&self, request: Request, writer: &mut WriteHalf<'_>) -> Result<()> {
        match self.do_get_leaderboard(&request).await {
            Ok(board) => respond(writer, OK_RESPONSE, board).await,
            Err(err) => respond_err(writer, &err).await,
        }
    }

    /// Live view: one snapshot read of membership, one batched snapshot of
    /// market data, ranking recomputed on every call.
    async fn do_get_leaderboard(&self, request: &Request) -> Result<Leaderboard, GroupError> {
        let group_id = request
            .params
            .as_ref()
            .and_then(|params| params.get("group_id"))
            .and_then(|value| value.parse::<i32>().ok())
            .ok_or(GroupError::InvalidGroupId)?;

        let group = self
            .group_repo
            .find_by_id(group_id)
            .await?
            .ok_or(GroupError::GroupNotFound)?;

        let members = self.member_repo.list_by_group(group.group_id).await?;
        let symbols = build::symbol_union(&members);
        let quotes = self.market.quotes(&symbols).await;

        Ok(build::build(&group, members, &quotes))
    }
}

fn parse_body<T: for<'a> Deserialize<'a> + Serialize>(request: &Request) -> Result<T, GroupError> {
    let body = request.body.as_deref().unwrap_or("");
    des_from_str(body).map_err(|_| GroupError::BadRequest)
}

async fn respond<T>(writer: &mut WriteHalf<'_>, status_line: &str, payload: T) -> Result<()>
where
    T: Serialize + for<'a> Deserialize<'a>,
{
    let response = Response {
        status: "ok".to_string(),
        message: payload,
    };
    let response_json = ser_to_str(&response)?;
    writer
        .write_all(format!("{}{}", status_line, response_json).as_bytes())
        .await?;
    Ok(())
}

async fn respond_err(writer: &mut WriteHalf<'_>, err: &GroupError) -> Result<()> {
    match err {
        GroupError::Database(_) | GroupError::Serde(_) => error!("{:?}", err),
        other => info!("{}", other),
    }
    let response = Response {
        status: "error".to_string(),
        message: err.public_message(),
    };
    let response_json = ser_to_str(&response)?;
    writer
        .write_all(format!("{}{}", err.http_status(), response_json).as_bytes())
        .await?;
    Ok(())
}
