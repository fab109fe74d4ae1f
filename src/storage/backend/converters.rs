use uuid::Uuid;

use crate::errors::{Result, SurveyError};
use crate::storage::{SurveyLink, SurveyResponse};
use migration::entities::{survey_link, survey_response};

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| SurveyError::database_operation(format!("无效的链接 id '{}': {}", raw, e)))
}

/// 将 Sea-ORM Model 转换为 SurveyLink
pub fn model_to_link(model: survey_link::Model) -> Result<SurveyLink> {
    Ok(SurveyLink {
        id: parse_id(&model.id)?,
        campaign_id: model.campaign_id,
        token: model.token,
        created_at: model.created_at,
        expires_at: model.expires_at,
    })
}

/// 将 SurveyLink 转换为 ActiveModel（仅用于插入）
pub fn link_to_active_model(link: &SurveyLink) -> survey_link::ActiveModel {
    use sea_orm::ActiveValue::*;

    survey_link::ActiveModel {
        id: Set(link.id.to_string()),
        campaign_id: Set(link.campaign_id.clone()),
        token: Set(link.token.clone()),
        created_at: Set(link.created_at),
        expires_at: Set(link.expires_at),
    }
}

/// 将 Sea-ORM Model 转换为 SurveyResponse
///
/// 库中分数越界视为数据损坏，而不是静默截断。
pub fn model_to_response(model: survey_response::Model) -> Result<SurveyResponse> {
    let score = u8::try_from(model.score)
        .ok()
        .filter(|s| *s <= 10)
        .ok_or_else(|| {
            SurveyError::database_operation(format!(
                "回复记录分数越界: link_id={}, score={}",
                model.link_id, model.score
            ))
        })?;

    Ok(SurveyResponse {
        link_id: parse_id(&model.link_id)?,
        score,
        comments: model.comments,
        submitted_at: model.submitted_at,
    })
}

/// 将 SurveyResponse 转换为 ActiveModel（id 由数据库自增）
pub fn response_to_active_model(response: &SurveyResponse) -> survey_response::ActiveModel {
    use sea_orm::ActiveValue::*;

    survey_response::ActiveModel {
        id: NotSet,
        link_id: Set(response.link_id.to_string()),
        score: Set(i16::from(response.score)),
        comments: Set(response.comments.clone()),
        submitted_at: Set(response.submitted_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::ActiveValue;

    fn create_test_link_model() -> survey_link::Model {
        survey_link::Model {
            id: Uuid::new_v4().to_string(),
            campaign_id: Some("spring-2026".to_string()),
            token: "opaque-token".to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::days(7),
        }
    }

    #[test]
    fn test_model_to_link_basic() {
        let model = create_test_link_model();
        let expected_id = model.id.clone();

        let link = model_to_link(model).unwrap();

        assert_eq!(link.id.to_string(), expected_id);
        assert_eq!(link.campaign_id.as_deref(), Some("spring-2026"));
        assert_eq!(link.token, "opaque-token");
    }

    #[test]
    fn test_model_to_link_rejects_corrupt_id() {
        let mut model = create_test_link_model();
        model.id = "not-a-uuid".to_string();

        let err = model_to_link(model).unwrap_err();
        assert!(matches!(err, SurveyError::DatabaseOperation(_)));
    }

    #[test]
    fn test_link_to_active_model_sets_all_fields() {
        let link = model_to_link(create_test_link_model()).unwrap();
        let active_model = link_to_active_model(&link);

        assert!(matches!(active_model.id, ActiveValue::Set(_)));
        assert!(matches!(active_model.token, ActiveValue::Set(_)));
        assert!(matches!(active_model.expires_at, ActiveValue::Set(_)));
        if let ActiveValue::Set(id) = active_model.id {
            assert_eq!(id, link.id.to_string());
        }
    }

    #[test]
    fn test_model_to_response_score_bounds() {
        let model = survey_response::Model {
            id: 1,
            link_id: Uuid::new_v4().to_string(),
            score: 10,
            comments: None,
            submitted_at: Utc::now(),
        };
        assert_eq!(model_to_response(model.clone()).unwrap().score, 10);

        let corrupt = survey_response::Model { score: 11, ..model.clone() };
        assert!(model_to_response(corrupt).is_err());

        let negative = survey_response::Model { score: -1, ..model };
        assert!(model_to_response(negative).is_err());
    }

    #[test]
    fn test_response_to_active_model_leaves_id_unset() {
        let response = SurveyResponse {
            link_id: Uuid::new_v4(),
            score: 7,
            comments: Some("ok".to_string()),
            submitted_at: Utc::now(),
        };
        let active_model = response_to_active_model(&response);

        assert!(matches!(active_model.id, ActiveValue::NotSet));
        if let ActiveValue::Set(score) = active_model.score {
            assert_eq!(score, 7);
        }
    }
}
