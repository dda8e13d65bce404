//! 临时密钥的访问策略
//!
//! 策略语法参考 <https://cloud.tencent.cn/document/product/598/69901>，
//! 只授予指定资源路径上的上传或下载权限。

use crate::error::{Error, Result};
use crate::utils::path::{join_slash, normalize_path};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 上传相关的全部操作
pub const UPLOAD_ACTIONS: &[&str] = &[
    // 简单上传
    "name/cos:PutObject",
    // 表单上传
    "name/cos:PostObject",
    // 分块上传
    "name/cos:InitiateMultipartUpload",
    "name/cos:ListMultipartUploads",
    "name/cos:ListParts",
    "name/cos:UploadPart",
    "name/cos:CompleteMultipartUpload",
    "name/cos:AbortMultipartUpload",
];

/// 下载操作
pub const VIEW_ACTIONS: &[&str] = &["name/cos:GetObject"];

pub const EFFECT_ALLOW: &str = "allow";
pub const POLICY_VERSION: &str = "2.0";

const CONDITION_OPERATOR: &str = "string_equal_ignore_case";
const CONDITION_CONTENT_TYPE: &str = "cos:content-type";

/// 条件运算符 -> (条件键 -> 取值列表)
pub type Condition = BTreeMap<String, BTreeMap<String, Vec<String>>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    pub action: Vec<String>,
    pub effect: String,
    pub resource: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl PolicyStatement {
    /// 条件中允许的 Content-Type 列表
    pub fn allowed_content_types(&self) -> Option<&[String]> {
        self.condition
            .as_ref()?
            .get(CONDITION_OPERATOR)?
            .get(CONDITION_CONTENT_TYPE)
            .map(Vec::as_slice)
    }
}

/// 提交给临时密钥服务的策略文档
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

impl Policy {
    pub fn new(statement: Vec<PolicyStatement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Upstream(format!("encode policy: {e}")))
    }
}

/// 按账号、存储桶和地域构建策略
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    region: String,
    app_id: String,
    bucket: String,
}

impl PolicyBuilder {
    /// # 参数
    ///
    /// * `region` - 存储桶所在地域
    /// * `app_id` - 账号 APPID
    /// * `bucket` - 完整的存储桶名称（`<名称>-<APPID>`）
    pub fn new(
        region: impl Into<String>,
        app_id: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            app_id: app_id.into(),
            bucket: bucket.into(),
        }
    }

    /// 资源前缀 `qcs::cos:<地域>:uid/<APPID>:<存储桶>`
    pub fn resource_base(&self) -> String {
        format!("qcs::cos:{}:uid/{}:{}", self.region, self.app_id, self.bucket)
    }

    fn resources<S: AsRef<str>>(&self, resources: &[S]) -> Vec<String> {
        let base = self.resource_base();
        resources
            .iter()
            .map(|resource| join_slash(&[base.as_str(), normalize_path(resource.as_ref()).as_str()]))
            .collect()
    }

    /// 上传策略：仅允许以指定 Content-Type 上传到指定路径
    pub fn upload_policy<R, C>(&self, resources: &[R], content_types: &[C]) -> Result<Policy>
    where
        R: AsRef<str>,
        C: AsRef<str>,
    {
        if resources.is_empty() {
            return Err(Error::EmptyResources);
        }
        if content_types.is_empty() {
            return Err(Error::EmptyContentTypes);
        }

        let mut condition = Condition::new();
        condition.entry(CONDITION_OPERATOR.to_string()).or_default().insert(
            CONDITION_CONTENT_TYPE.to_string(),
            content_types.iter().map(|ct| ct.as_ref().to_string()).collect(),
        );

        Ok(Policy::new(vec![PolicyStatement {
            action: UPLOAD_ACTIONS.iter().map(|a| a.to_string()).collect(),
            effect: EFFECT_ALLOW.to_string(),
            resource: self.resources(resources),
            condition: Some(condition),
        }]))
    }

    /// 下载策略：仅允许读取指定路径
    pub fn view_policy<R: AsRef<str>>(&self, resources: &[R]) -> Result<Policy> {
        if resources.is_empty() {
            return Err(Error::EmptyResources);
        }

        Ok(Policy::new(vec![PolicyStatement {
            action: VIEW_ACTIONS.iter().map(|a| a.to_string()).collect(),
            effect: EFFECT_ALLOW.to_string(),
            resource: self.resources(resources),
            condition: None,
        }]))
    }
}
