use super::{
    assistants::AssistantsProvider, base::AssistantProvider, configs::ProviderConfig,
    responses::ResponsesProvider,
};
use crate::errors::ProviderResult;

pub fn get_provider(config: ProviderConfig) -> ProviderResult<Box<dyn AssistantProvider>> {
    match config {
        ProviderConfig::Responses(responses_config) => {
            Ok(Box::new(ResponsesProvider::new(responses_config)?))
        }
        ProviderConfig::Assistants(assistants_config) => {
            Ok(Box::new(AssistantsProvider::new(assistants_config)?))
        }
    }
}
