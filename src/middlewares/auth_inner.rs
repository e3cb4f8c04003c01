//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;
use crate::core::AppState;
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::models::token::TokenKind;
use crate::errors::{AppError, AppResult};
use crate::middlewares::token_extractor::{extract_token, TokenSource};

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub sources: Rc<[TokenSource]>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let sources = self.sources.clone();

        Box::pin(async move {
            match authenticate(&req, &sources).await {
                Ok(user) => {
                    log::debug!("인증 성공: 사용자 ID {}", user.user_id);
                    // 사용자 정보를 Request Extensions에 저장
                    req.extensions_mut().insert(user);
                }
                Err(err) => {
                    match &err {
                        AppError::MissingCredential => log::debug!("인증 정보 없음: {}", req.path()),
                        e if e.is_token_failure() => log::warn!("인증 실패: {} {}", req.path(), e),
                        e => log::error!("인증 처리 오류: {} {}", req.path(), e),
                    }
                    let response = err.error_response();
                    let (req, _) = req.into_parts();
                    let res = ServiceResponse::new(req, response).map_into_right_body();
                    return Ok(res);
                }
            }

            // 다음 서비스로 요청 전달
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 요청에서 액세스 토큰을 추출하고 검증
///
/// 제공자에게 다시 확인하지 않습니다. 서명, 용도, 만료, 폐기 여부만 봅니다.
async fn authenticate(req: &ServiceRequest, sources: &[TokenSource]) -> AppResult<AuthenticatedUser> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalError("AppState is not registered".to_string()))?;

    let token = extract_token(req.request(), sources).ok_or(AppError::MissingCredential)?;
    let claims = state.codec.verify(&token, TokenKind::Access)?;

    if state.revocations.is_revoked(&token).await? {
        return Err(AppError::RevokedToken);
    }

    Ok(AuthenticatedUser::from(claims))
}
