pub mod survey_link;
pub mod survey_response;

pub use survey_link::Entity as SurveyLinkEntity;
pub use survey_response::Entity as SurveyResponseEntity;
