// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Route-level permission guard.
//!
//! [`RequirePermission`] is a Tower layer applied to admin route groups. It
//! consults the [`AuthContext`] placed in request extensions by the auth
//! middleware, so it always observes a settled session state and never
//! performs I/O of its own.
//!
//! # Security Properties
//!
//! - Denied decisions are logged with user_id and the permission (never tokens)
//! - Browser navigation (`Accept: text/html`) is sent back to the public site
//!   with 303 See Other instead of a bare error page
//! - API clients receive 401 Unauthorized / 403 Forbidden JSON envelopes
//! - Error responses do not leak which permission was missing
//!
//! # Example
//!
//! ```ignore
//! Router::new()
//!     .route("/api/admin/users", get(list_users))
//!     .route_layer(RequirePermission::new(Permission::ManageSettings));
//! ```

use axum::{
	body::Body,
	http::{header, HeaderValue, Request, StatusCode},
	response::{IntoResponse, Redirect, Response},
	Json,
};
use folio_server_auth::{middleware::AuthContext, Permission};
use pin_project_lite::pin_project;
use std::{
	future::Future,
	pin::Pin,
	task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::error::ErrorResponse;

/// Route layer that checks the active session for a permission.
#[derive(Clone)]
pub struct RequirePermission {
	permission: Permission,
}

impl RequirePermission {
	/// Create a new permission requirement.
	pub fn new(permission: Permission) -> Self {
		Self { permission }
	}
}

impl<S> Layer<S> for RequirePermission {
	type Service = RequirePermissionService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequirePermissionService {
			inner,
			permission: self.permission,
		}
	}
}

/// Service wrapper for [`RequirePermission`] layer.
#[derive(Clone)]
pub struct RequirePermissionService<S> {
	inner: S,
	permission: Permission,
}

impl<S> Service<Request<Body>> for RequirePermissionService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = RequirePermissionFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let auth_ctx = req
			.extensions()
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_else(AuthContext::unauthenticated);

		let html = wants_html(&req);

		let Some(session) = auth_ctx.session() else {
			tracing::debug!(
				permission = %self.permission,
				"guard denied: not authenticated"
			);
			return RequirePermissionFuture::Rejected {
				resp: Some(unauthenticated_response(html)),
			};
		};

		if !auth_ctx.check_permission(self.permission) {
			tracing::info!(
				user_id = %session.user_id,
				role = %session.role,
				permission = %self.permission,
				"guard denied: permission check failed"
			);
			return RequirePermissionFuture::Rejected {
				resp: Some(forbidden_response(html)),
			};
		}

		tracing::debug!(
			user_id = %session.user_id,
			permission = %self.permission,
			"guard allowed"
		);

		RequirePermissionFuture::Inner {
			fut: self.inner.call(req),
		}
	}
}

pin_project! {
	/// Future for [`RequirePermissionService`].
	#[project = RequirePermissionFutureProj]
	pub enum RequirePermissionFuture<F> {
		Inner { #[pin] fut: F },
		Rejected { resp: Option<Response> },
	}
}

impl<F, E> Future for RequirePermissionFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match self.project() {
			RequirePermissionFutureProj::Inner { fut } => fut.poll(cx),
			RequirePermissionFutureProj::Rejected { resp } => {
				Poll::Ready(Ok(resp.take().expect("polled after completion")))
			}
		}
	}
}

/// Whether the client is a navigating browser rather than an API consumer.
fn wants_html(req: &Request<Body>) -> bool {
	req.headers()
		.get(header::ACCEPT)
		.map(HeaderValue::to_str)
		.and_then(Result::ok)
		.map(|accept| accept.contains("text/html"))
		.unwrap_or(false)
}

fn unauthenticated_response(html: bool) -> Response {
	if html {
		return Redirect::to("/").into_response();
	}
	(
		StatusCode::UNAUTHORIZED,
		Json(ErrorResponse {
			error: "unauthorized".to_string(),
			message: "Authentication required".to_string(),
		}),
	)
		.into_response()
}

fn forbidden_response(html: bool) -> Response {
	if html {
		return Redirect::to("/").into_response();
	}
	(
		StatusCode::FORBIDDEN,
		Json(ErrorResponse {
			error: "forbidden".to_string(),
			message: "Insufficient permissions".to_string(),
		}),
	)
		.into_response()
}
