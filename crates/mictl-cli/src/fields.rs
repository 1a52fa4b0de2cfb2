//! Template field names exposed by each management API payload.

use mictl_api_models::{
    DataServiceInfo, DataServiceQuery, DataServiceSummary, Logger, MessageStoreInfo,
    MessageStoreSummary, StoreProperty, TransactionCount, UserSummary,
};

use crate::template::{FieldValue, TemplateData};

impl TemplateData for UserSummary {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "UserId" => Some(FieldValue::text(&self.user_id)),
            "IsAdmin" => Some(FieldValue::display(self.is_admin)),
            "Roles" => Some(FieldValue::items(&self.roles)),
            _ => None,
        }
    }
}

impl TemplateData for Logger {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "LoggerName" => Some(FieldValue::text(&self.logger_name)),
            "LogLevel" => Some(FieldValue::text(&self.log_level)),
            "ComponentName" => Some(FieldValue::text(&self.component_name)),
            _ => None,
        }
    }
}

impl TemplateData for DataServiceSummary {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "ServiceName" => Some(FieldValue::text(&self.service_name)),
            "Wsdl11" => Some(FieldValue::text(&self.wsdl11)),
            "Wsdl20" => Some(FieldValue::text(&self.wsdl20)),
            _ => None,
        }
    }
}

impl TemplateData for DataServiceInfo {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "ServiceName" => Some(FieldValue::text(&self.service_name)),
            "ServiceGroupName" => Some(FieldValue::text(&self.service_group_name)),
            "ServiceDescription" => Some(FieldValue::text(&self.service_description)),
            "Wsdl11" => Some(FieldValue::text(&self.wsdl11)),
            "Wsdl20" => Some(FieldValue::text(&self.wsdl20)),
            "Queries" => Some(FieldValue::items(&self.queries)),
            _ => None,
        }
    }
}

impl TemplateData for DataServiceQuery {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "Id" => Some(FieldValue::text(&self.id)),
            "Namespace" => Some(FieldValue::text(&self.namespace)),
            _ => None,
        }
    }
}

impl TemplateData for MessageStoreSummary {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "Name" => Some(FieldValue::text(&self.name)),
            "Type" => Some(FieldValue::text(&self.store_type)),
            "Size" => Some(FieldValue::display(self.size)),
            _ => None,
        }
    }
}

impl TemplateData for MessageStoreInfo {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "Name" => Some(FieldValue::text(&self.name)),
            "File" => Some(FieldValue::text(&self.file)),
            "Container" => Some(FieldValue::text(&self.container)),
            "Size" => Some(FieldValue::display(self.size)),
            "Properties" => Some(FieldValue::items(&self.properties)),
            _ => None,
        }
    }
}

impl TemplateData for StoreProperty {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "Name" => Some(FieldValue::text(&self.name)),
            "Value" => Some(FieldValue::text(&self.value)),
            _ => None,
        }
    }
}

impl TemplateData for TransactionCount {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "Year" => Some(FieldValue::display(self.year)),
            "Month" => Some(FieldValue::display(self.month)),
            "TransactionCount" => Some(FieldValue::display(self.transaction_count)),
            _ => None,
        }
    }
}
