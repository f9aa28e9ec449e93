//! Declarative description of a transact job.

use alloy::rpc::types::TransactionRequest;
use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;

use crate::safe::SafeTransaction;
use crate::transact::backend::{Receipt, SubmittedTransaction};
use crate::transact::error::{BoxError, TransactError, TransactResult};
use crate::transact::status::{self, StatusMessage};

pub type SubmitFuture = BoxFuture<'static, TransactResult<Box<dyn SubmittedTransaction>>>;
pub type SubmitFn = Box<dyn FnOnce() -> SubmitFuture + Send>;

pub type BeforeFn<C> = Box<dyn FnOnce() -> BoxFuture<'static, Result<C, BoxError>> + Send>;
pub type TransactionsFn<C> = Box<dyn FnOnce(&C) -> Transactions + Send>;
pub type AfterFn<C> =
    Box<dyn FnOnce(Vec<Receipt>, C) -> BoxFuture<'static, Result<(), BoxError>> + Send>;

/// How a transaction reaches the signing backend.
pub enum TransactionCall {
    /// Pre-built call descriptor handed to the wallet's signer.
    Populated(TransactionRequest),
    /// Factory that builds and submits the call itself.
    Submit(SubmitFn),
}

impl std::fmt::Debug for TransactionCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Populated(request) => f.debug_tuple("Populated").field(request).finish(),
            Self::Submit(_) => f.write_str("Submit(..)"),
        }
    }
}

/// One on-chain call plus optional copy for its signature and confirmation phases.
#[derive(Debug)]
pub struct TransactionSpec {
    pub call: TransactionCall,
    pub waiting_signature_message: Option<StatusMessage>,
    pub waiting_confirmation_message: Option<StatusMessage>,
}

impl TransactionSpec {
    pub fn populated(request: TransactionRequest) -> Self {
        Self::from_call(TransactionCall::Populated(request))
    }

    pub fn submit<F, Fut>(factory: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = TransactResult<Box<dyn SubmittedTransaction>>> + Send + 'static,
    {
        Self::from_call(TransactionCall::Submit(Box::new(move || factory().boxed())))
    }

    fn from_call(call: TransactionCall) -> Self {
        Self {
            call,
            waiting_signature_message: None,
            waiting_confirmation_message: None,
        }
    }

    pub fn with_signature_message(mut self, message: impl Into<StatusMessage>) -> Self {
        self.waiting_signature_message = Some(message.into());
        self
    }

    pub fn with_confirmation_message(mut self, message: impl Into<StatusMessage>) -> Self {
        self.waiting_confirmation_message = Some(message.into());
        self
    }

    /// The call as a multisig batch entry. Batched calls must be pre-built
    /// zero-value descriptors carrying both `to` and `data`.
    pub(crate) fn safe_transaction(&self) -> TransactResult<SafeTransaction> {
        match &self.call {
            TransactionCall::Populated(request) => SafeTransaction::from_request(request)
                .ok_or(TransactError::Unreachable(
                    "batched transaction must be a zero-value call with `to` and `data`",
                )),
            TransactionCall::Submit(_) => Err(TransactError::Unreachable(
                "batched transaction must be a pre-built call descriptor",
            )),
        }
    }
}

/// Either one call or an ordered list of calls.
///
/// A list is a batch even with a single element.
#[derive(Debug)]
pub enum Transactions {
    Single(TransactionSpec),
    Batch(Vec<TransactionSpec>),
}

impl Transactions {
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(specs) => specs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<TransactionSpec> for Transactions {
    fn from(spec: TransactionSpec) -> Self {
        Self::Single(spec)
    }
}

impl From<Vec<TransactionSpec>> for Transactions {
    fn from(specs: Vec<TransactionSpec>) -> Self {
        Self::Batch(specs)
    }
}

/// Copy overriding the defaults of the before/after phases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseMessages {
    pub during_before: Option<StatusMessage>,
    pub during_after: Option<StatusMessage>,
}

/// A full job: optional setup, the transactions, optional finalization.
///
/// `C` is the context produced by `before` and handed to `transactions` and
/// `after`; without a `before` step it is `C::default()`.
pub struct TransactPayload<C = ()> {
    pub(crate) before: Option<BeforeFn<C>>,
    pub(crate) transactions: TransactionsFn<C>,
    pub(crate) after: Option<AfterFn<C>>,
    pub(crate) messages: PhaseMessages,
}

impl<C> TransactPayload<C>
where
    C: Default + Send + 'static,
{
    pub fn new<F, T>(transactions: F) -> Self
    where
        F: FnOnce(&C) -> T + Send + 'static,
        T: Into<Transactions>,
    {
        Self {
            before: None,
            transactions: Box::new(move |context: &C| transactions(context).into()),
            after: None,
            messages: PhaseMessages::default(),
        }
    }

    pub fn before<F, Fut>(mut self, before: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<C, BoxError>> + Send + 'static,
    {
        self.before = Some(Box::new(move || before().boxed()));
        self
    }

    /// Runs only outside multisig mode, after every receipt is in.
    pub fn after<F, Fut>(mut self, after: F) -> Self
    where
        F: FnOnce(Vec<Receipt>, C) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.after = Some(Box::new(move |receipts, context| after(receipts, context).boxed()));
        self
    }

    pub fn during_before(mut self, message: impl Into<StatusMessage>) -> Self {
        self.messages.during_before = Some(message.into());
        self
    }

    pub fn during_after(mut self, message: impl Into<StatusMessage>) -> Self {
        self.messages.during_after = Some(message.into());
        self
    }

    /// Message shown while the flow is handed to the UI.
    pub fn initial_message(&self) -> StatusMessage {
        self.messages
            .during_before
            .clone()
            .unwrap_or_else(status::getting_ready)
    }
}

impl<C> std::fmt::Debug for TransactPayload<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactPayload")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("messages", &self.messages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::network::TransactionBuilder;
    use alloy::primitives::{Address, Bytes};

    fn call(byte: u8) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(Address::repeat_byte(byte))
            .with_input(Bytes::from(vec![byte]))
    }

    #[test]
    fn test_initial_message() {
        let payload: TransactPayload = TransactPayload::new(|_| TransactionSpec::populated(call(1)));
        assert_eq!(payload.initial_message().message, "Getting ready...");

        let payload = payload.during_before("Approving...");
        assert_eq!(payload.initial_message().message, "Approving...");
    }

    #[test]
    fn test_transactions_receive_context() {
        let payload: TransactPayload<u8> = TransactPayload::new(|count: &u8| {
            (0..*count).map(|i| TransactionSpec::populated(call(i))).collect::<Vec<_>>()
        });

        let transactions = (payload.transactions)(&3);
        assert!(matches!(transactions, Transactions::Batch(ref specs) if specs.len() == 3));
    }

    #[test]
    fn test_safe_transaction_requires_populated_call() {
        let spec = TransactionSpec::populated(call(9));
        assert_eq!(spec.safe_transaction().unwrap().to, Address::repeat_byte(9));

        let spec = TransactionSpec::populated(TransactionRequest::default());
        assert!(matches!(
            spec.safe_transaction(),
            Err(TransactError::Unreachable(_))
        ));

        let spec = TransactionSpec::submit(|| async {
            Err::<Box<dyn SubmittedTransaction>, _>(TransactError::NoSigner)
        });
        assert!(matches!(
            spec.safe_transaction(),
            Err(TransactError::Unreachable(_))
        ));
    }

    #[test]
    fn test_single_element_list_is_a_batch() {
        let transactions: Transactions = vec![TransactionSpec::populated(call(1))].into();
        assert!(matches!(transactions, Transactions::Batch(_)));
        assert_eq!(transactions.len(), 1);
    }
}
