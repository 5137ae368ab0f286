//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum used to classify failures reported by
//! the hosted backend (and local validation) on the client side.

use serde::Serialize;

/// エラー種別の列挙体
///
/// ホスト型バックエンドが返す HTTP ステータスコードに対応する分類です。
/// クライアント側では主に `from_status` でレスポンスを分類し、
/// リトライ可否やユーザー向け文言の選択に使います。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::from_status(404).unwrap();
/// assert_eq!(kind, ErrorKind::NotFound);
/// assert_eq!(kind.as_str(), "Not Found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - Bad Request: リクエストが不正
    BadRequest,
    /// 401 - Unauthorized: 認証が必要
    Unauthorized,
    /// 403 - Forbidden: アクセス権限なし
    Forbidden,
    /// 404 - Not Found: リソースが見つからない
    NotFound,
    /// 408 - Request Timeout: リクエストタイムアウト
    RequestTimeout,
    /// 409 - Conflict: 現在の状態と競合
    Conflict,
    /// 410 - Gone: リソースが削除された/期限切れ
    Gone,
    /// 422 - Unprocessable Entity: 処理不可能なエンティティ
    UnprocessableEntity,
    /// 429 - Too Many Requests: レート制限超過
    TooManyRequests,
    /// 500 - Internal Server Error: サーバー内部エラー
    InternalServerError,
    /// 503 - Service Unavailable: サービス利用不可
    ServiceUnavailable,
}

impl ErrorKind {
    /// HTTP ステータスコードを取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::BadRequest.status_code(), 400);
    /// assert_eq!(ErrorKind::NotFound.status_code(), 404);
    /// ```
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::RequestTimeout => 408,
            ErrorKind::Conflict => 409,
            ErrorKind::Gone => 410,
            ErrorKind::UnprocessableEntity => 422,
            ErrorKind::TooManyRequests => 429,
            ErrorKind::InternalServerError => 500,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// リモートのステータスコードから種別を得る
    ///
    /// 既知のコードに一致しない場合はステータスクラスで丸めます
    /// （4xx → `BadRequest`、5xx → `InternalServerError`、その他 → `None`）。
    pub const fn from_status(status: u16) -> Option<Self> {
        match status {
            400 => Some(ErrorKind::BadRequest),
            401 => Some(ErrorKind::Unauthorized),
            403 => Some(ErrorKind::Forbidden),
            404 => Some(ErrorKind::NotFound),
            408 => Some(ErrorKind::RequestTimeout),
            409 => Some(ErrorKind::Conflict),
            410 => Some(ErrorKind::Gone),
            422 => Some(ErrorKind::UnprocessableEntity),
            429 => Some(ErrorKind::TooManyRequests),
            500 => Some(ErrorKind::InternalServerError),
            503 => Some(ErrorKind::ServiceUnavailable),
            s if s >= 500 && s < 600 => Some(ErrorKind::InternalServerError),
            s if s >= 400 && s < 500 => Some(ErrorKind::BadRequest),
            _ => None,
        }
    }

    /// ユーザー向けの文字列表現を取得
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::RequestTimeout => "Request Timeout",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Gone => "Gone",
            ErrorKind::UnprocessableEntity => "Unprocessable Entity",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// サーバー側のエラーかどうかを判定
    ///
    /// 5xx系のエラーは `true` を返します。
    /// これらのエラーはログに記録すべきです。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// クライアント側のエラーかどうかを判定
    ///
    /// 4xx系のエラーは `true` を返します。
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }

    /// 同じリクエストを再送して成功しうるかどうかを判定
    ///
    /// タイムアウト・レート制限・一時的なサービス停止のみ `true` です。
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::RequestTimeout | ErrorKind::TooManyRequests | ErrorKind::ServiceUnavailable
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::BadRequest.status_code(), 400);
        assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
        assert_eq!(ErrorKind::Forbidden.status_code(), 403);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::RequestTimeout.status_code(), 408);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::Gone.status_code(), 410);
        assert_eq!(ErrorKind::UnprocessableEntity.status_code(), 422);
        assert_eq!(ErrorKind::TooManyRequests.status_code(), 429);
        assert_eq!(ErrorKind::InternalServerError.status_code(), 500);
        assert_eq!(ErrorKind::ServiceUnavailable.status_code(), 503);
    }

    #[test]
    fn test_from_status_known() {
        assert_eq!(ErrorKind::from_status(401), Some(ErrorKind::Unauthorized));
        assert_eq!(ErrorKind::from_status(410), Some(ErrorKind::Gone));
        assert_eq!(
            ErrorKind::from_status(503),
            Some(ErrorKind::ServiceUnavailable)
        );
    }

    #[test]
    fn test_from_status_rounding() {
        assert_eq!(ErrorKind::from_status(418), Some(ErrorKind::BadRequest));
        assert_eq!(
            ErrorKind::from_status(502),
            Some(ErrorKind::InternalServerError)
        );
        assert_eq!(ErrorKind::from_status(302), None);
        assert_eq!(ErrorKind::from_status(200), None);
    }

    #[test]
    fn test_is_server_error() {
        assert!(!ErrorKind::BadRequest.is_server_error());
        assert!(!ErrorKind::NotFound.is_server_error());
        assert!(ErrorKind::InternalServerError.is_server_error());
        assert!(ErrorKind::ServiceUnavailable.is_server_error());
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::RequestTimeout.is_retryable());
        assert!(ErrorKind::ServiceUnavailable.is_retryable());
        assert!(!ErrorKind::Unauthorized.is_retryable());
        assert!(!ErrorKind::Conflict.is_retryable());
    }
}
