//! Bundled standard definitions.
//!
//! Order matters: it becomes the registry order and therefore the order of
//! `matched_erc` in classification output. It follows the order of the
//! `erc_config.json` files earlier result sets were produced with, so rows
//! from old and new runs compare equal.

use crate::error::RegistryError;
use crate::registry::SignatureRegistry;
use crate::standard::StandardDefinition;

/// An event: canonical signature, plus display text when it names its
/// parameters.
#[derive(Debug, Clone, Copy)]
struct Event {
    signature: &'static str,
    text: Option<&'static str>,
}

const fn ev(signature: &'static str) -> Event {
    Event {
        signature,
        text: None,
    }
}

const fn named(signature: &'static str, text: &'static str) -> Event {
    Event {
        signature,
        text: Some(text),
    }
}

type Entry = (&'static str, &'static [&'static str], &'static [Event]);

const CATALOG: &[Entry] = &[
    (
        "ERC20",
        &[
            "allowance(address,address)",
            "approve(address,uint256)",
            "balanceOf(address)",
            "totalSupply()",
            "transfer(address,uint256)",
            "transferFrom(address,address,uint256)",
        ],
        &[
            ev("Approval(address,address,uint256)"),
            ev("Transfer(address,address,uint256)"),
        ],
    ),
    (
        "ERC721",
        &[
            "approve(address,uint256)",
            "balanceOf(address)",
            "getApproved(uint256)",
            "isApprovedForAll(address,address)",
            "ownerOf(uint256)",
            "safeTransferFrom(address,address,uint256)",
            "safeTransferFrom(address,address,uint256,bytes)",
            "setApprovalForAll(address,bool)",
            "supportsInterface(bytes4)",
            "transferFrom(address,address,uint256)",
        ],
        &[
            ev("Approval(address,address,uint256)"),
            ev("ApprovalForAll(address,address,bool)"),
            ev("Transfer(address,address,uint256)"),
        ],
    ),
    (
        "ERC1155",
        &[
            "balanceOf(address,uint256)",
            "balanceOfBatch(address[],uint256[])",
            "isApprovedForAll(address,address)",
            "safeBatchTransferFrom(address,address,uint256[],uint256[],bytes)",
            "safeTransferFrom(address,address,uint256,uint256,bytes)",
            "setApprovalForAll(address,bool)",
            "supportsInterface(bytes4)",
        ],
        &[
            ev("ApprovalForAll(address,address,bool)"),
            ev("TransferBatch(address,address,address,uint256[],uint256[])"),
            ev("TransferSingle(address,address,address,uint256,uint256)"),
            ev("URI(string,uint256)"),
        ],
    ),
    ("ERC165", &["supportsInterface(bytes4)"], &[]),
    (
        "ERC173",
        &[
            "owner()",
            "supportsInterface(bytes4)",
            "transferOwnership(address)",
        ],
        &[named(
            "OwnershipTransferred(address,address)",
            "event OwnershipTransferred(address indexed previousOwner, address indexed newOwner)",
        )],
    ),
    (
        "ERC777",
        &[
            "name()",
            "symbol()",
            "totalSupply()",
            "balanceOf(address)",
            "send(address,uint256,bytes)",
            "transfer(address,uint256)",
            "authorizeOperator(address)",
            "revokeOperator(address)",
            "isOperatorFor(address,address)",
            "operatorSend(address,address,uint256,bytes,bytes)",
            "burn(uint256,bytes)",
            "operatorBurn(address,uint256,bytes,bytes)",
            "granularity()",
        ],
        &[
            ev("Sent(address,address,address,uint256,bytes,bytes)"),
            ev("Minted(address,address,uint256,bytes,bytes)"),
            ev("Burned(address,address,uint256,bytes,bytes)"),
            ev("AuthorizedOperator(address,address)"),
            ev("RevokedOperator(address,address)"),
        ],
    ),
    ("ERC2981", &["royaltyInfo(uint256,uint256)"], &[]),
    (
        "ERC223",
        &[
            "transfer(address,uint256,bytes)",
            "tokenReceived(address,uint256,bytes)",
        ],
        &[named(
            "Transfer(address,address,uint256,bytes)",
            "event Transfer(address indexed from, address indexed to, uint256 value, bytes data)",
        )],
    ),
    (
        "ERC884",
        &[
            "getCurrentFor(address)",
            "isSuperseded(address)",
            "holderAt(uint256)",
            "holderCount()",
            "isVerified(address)",
            "isHolder(address)",
            "hasHash(address,bytes32)",
            "addVerified(address,bytes32)",
            "removeVerified(address)",
            "updateVerified(address,bytes32)",
            "cancelAndReissue(address,address)",
        ],
        &[
            ev("VerifiedAddressAdded(address,bytes32)"),
            ev("VerifiedAddressRemoved(address)"),
            ev("VerifiedAddressUpdated(address,bytes32)"),
            ev("HolderAdded(address)"),
            ev("HolderRemoved(address)"),
        ],
    ),
    (
        "ERC998",
        &[
            "transferChild(uint256,address,uint256)",
            "safeTransferChild(uint256,address,uint256,bytes)",
            "transferChildToParent(address,uint256,address,uint256,uint256,bytes)",
            "getChild(address,uint256,address,uint256)",
            "safeTransferChild(uint256,address,address,uint256)",
            "onERC721Received(address,address,uint256,bytes)",
            "ownerOfChild(address,uint256)",
            "childContractByIndex(uint256,uint256)",
            "childTokenByIndex(uint256,uint256)",
            "rootOwnerOfChild(address,uint256)",
            "rootOwnerOf(uint256)",
        ],
        &[
            ev("TransferChild(uint256,address,uint256)"),
            ev("ReceivedChild(address,uint256,address,uint256)"),
        ],
    ),
    (
        "ERC1363",
        &[
            "transferAndCall(address,uint256)",
            "transferAndCall(address,uint256,bytes)",
            "transferFromAndCall(address,address,uint256)",
            "transferFromAndCall(address,address,uint256,bytes)",
            "approveAndCall(address,uint256)",
            "approveAndCall(address,uint256,bytes)",
            "onTransferReceived(address,address,uint256,bytes)",
            "onApprovalReceived(address,uint256,bytes)",
        ],
        &[
            ev("Transfer(address,address,uint256)"),
            ev("Approval(address,address,uint256)"),
        ],
    ),
    (
        "ERC875",
        &[
            "name()",
            "symbol()",
            "balanceOf(address)",
            "transfer(address,uint256[])",
            "transferFrom(address,address,uint256[])",
            "totalSupply()",
            "ownerOf(uint256)",
            "trade(uint256,uint256[],uint8,bytes32,bytes32)",
        ],
        &[
            ev("Transfer(address,address,uint256[])"),
            ev("Trade(uint256,uint256[],uint8,bytes32,bytes32)"),
        ],
    ),
    ("ERC1046", &["tokenURI()"], &[]),
    (
        "ERC2612",
        &[
            "permit(address,address,uint256,uint256,uint8,bytes32,bytes32)",
            "nonces(address)",
            "DOMAIN_SEPARATOR()",
        ],
        &[named(
            "Permit(address,address,uint256,uint256,uint8,bytes32,bytes32)",
            "event Permit(address indexed owner, address indexed spender, uint256 value, uint256 deadline, uint8 v, bytes32 r, bytes32 s)",
        )],
    ),
    (
        "ERC1948",
        &["readData(uint256)", "writeData(uint256,bytes)"],
        &[named(
            "DataUpdated(uint256,bytes)",
            "event DataUpdated(uint256 indexed tokenId, bytes data)",
        )],
    ),
    (
        "ERC1261",
        &[
            "addMember(address,uint256[])",
            "revokeMembership(address)",
            "getMemberRoles(address)",
            "isMember(address)",
            "name()",
            "symbol()",
        ],
        &[
            ev("MemberAdded(address,uint256[])"),
            ev("MembershipRevoked(address)"),
        ],
    ),
    (
        "ERC1337",
        &[
            "modifyStatus(uint256,uint8,bytes)",
            "executeSubscription(address,uint256,bytes,uint8,uint256,uint256,uint256,address,bytes,bytes)",
            "isValidSubscription(uint256)",
            "getSubscriptionStatus(uint256)",
            "getSubscriptionHash(address,uint256,bytes,uint8,uint256,uint256,uint256,address,bytes)",
            "getModifyStatusHash(bytes32,uint8)",
        ],
        &[
            ev("SubscriptionExecuted(address,uint256,bytes,uint8,uint256,uint256,uint256,address,bytes,bytes)"),
            ev("StatusModified(uint256,uint8,bytes)"),
        ],
    ),
    (
        "ERC2021",
        &[
            "orderPayoutFrom(string,address,uint256,string)",
            "orderPayout(string,uint256,string)",
            "authorizePayoutOperator(address)",
            "revokePayoutOperator(address)",
            "cancelPayout(string)",
            "processPayout(string)",
            "putFundsInSuspenseInPayout(string)",
            "executePayout(string)",
            "rejectPayout(string,string)",
            "isPayoutOperatorFor(address,address)",
            "retrievePayoutData(string)",
        ],
        &[
            ev("PayoutOrdered(string,address,uint256,string)"),
            ev("PayoutProcessed(string)"),
            ev("PayoutExecuted(string)"),
            ev("PayoutRejected(string,string)"),
        ],
    ),
    (
        "ERC2018",
        &[
            "orderTransfer(string,address,uint256)",
            "orderTransferFrom(string,address,address,uint256)",
            "authorizeClearableTransferOperator(address)",
            "revokeClearableTransferOperator(address)",
            "cancelTransfer(string)",
            "processClearableTransfer(string)",
            "executeClearableTransfer(string)",
            "rejectClearableTransfer(string,string)",
            "retrieveClearableTransferData(string)",
            "isClearableTransferOperatorFor(address,address)",
        ],
        &[
            ev("TransferOrdered(string,address,uint256)"),
            ev("TransferProcessed(string)"),
            ev("TransferExecuted(string)"),
            ev("TransferRejected(string,string)"),
        ],
    ),
    (
        "ERC2019",
        &[
            "authorizeFundOperator(address)",
            "revokeFundOperator(address)",
            "orderFund(string,uint256,string)",
            "orderFundFrom(string,address,uint256,string)",
            "cancelFund(string)",
            "processFund(string)",
            "executeFund(string)",
            "rejectFund(string,string)",
            "isFundOperatorFor(address,address)",
            "retrieveFundData(address,string)",
        ],
        &[
            ev("FundOrdered(string,uint256,string)"),
            ev("FundProcessed(string)"),
            ev("FundExecuted(string)"),
            ev("FundRejected(string,string)"),
        ],
    ),
    // Hold events are left out, matching the published config.
    (
        "ERC1996",
        &[
            "hold(string,address,address,uint256,uint256)",
            "holdFrom(string,address,address,address,uint256,uint256)",
            "releaseHold(string)",
            "executeHold(string,uint256)",
            "renewHold(string,uint256)",
            "retrieveHoldData(string)",
            "balanceOnHold(address)",
            "netBalanceOf(address)",
            "totalSupplyOnHold()",
            "authorizeHoldOperator(address)",
            "revokeHoldOperator(address)",
            "isHoldOperatorFor(address,address)",
        ],
        &[],
    ),
    (
        "ERC2020",
        &[
            "currency()",
            "version()",
            "availableFunds(address)",
            "checkTransferAllowed(address,address,uint256)",
            "checkApproveAllowed(address,address,uint256)",
            "checkHoldAllowed(address,address,address,uint256)",
            "checkAuthorizeHoldOperatorAllowed(address,address)",
            "checkOrderTransferAllowed(address,address,uint256)",
            "checkAuthorizeClearableTransferOperatorAllowed(address,address)",
            "checkOrderFundAllowed(address,address,uint256)",
            "checkAuthorizeFundOperatorAllowed(address,address)",
            "checkOrderPayoutAllowed(address,address,uint256)",
            "checkAuthorizePayoutOperatorAllowed(address,address)",
        ],
        &[],
    ),
    (
        "ERC3135",
        &[
            "iconUrl()",
            "issuer()",
            "claim(address,uint256,uint256,bytes)",
            "transferIssuer(address)",
            "deposit(uint256)",
            "withdraw(address,uint256)",
            "depositBalanceOf(address)",
        ],
        &[],
    ),
    (
        "ERC3440",
        &[
            "signArtwork(uint256,bytes)",
            "getSignature(uint256)",
            "verifySignature(uint256,bytes)",
            "setEditionLimit(uint256,uint256)",
            "getEditionLimit(uint256)",
            "markAsOriginal(uint256)",
            "isOriginal(uint256)",
            "setArtist(address)",
            "getArtist(uint256)",
        ],
        &[named(
            "ArtworkSigned(uint256,address,bytes)",
            "event ArtworkSigned(uint256 indexed tokenId, address indexed artist, bytes signature)",
        )],
    ),
    (
        "ERC3589",
        &[
            "hash(uint256,address[],uint256[])",
            "mint(address,address[],uint256[])",
            "safeMint(address,address[],uint256[])",
            "burn(address,uint256,uint256,address[],uint256[])",
        ],
        &[named(
            "AssemblyTokenMinted(uint256,address,address[],uint256[])",
            "event AssemblyTokenMinted(uint256 indexed tokenId, address indexed to, address[] addresses, uint256[] numbers)",
        )],
    ),
    (
        "ERC3754",
        &[
            "balanceOf(address)",
            "ownerOf(uint256)",
            "approve(address,uint256)",
            "getApproved(uint256)",
            "setApprovalForAll(address,bool)",
            "isApprovedForAll(address,address)",
            "transferFrom(address,address,uint256)",
            "safeTransferFrom(address,address,uint256)",
            "safeTransferFrom(address,address,uint256,bytes)",
        ],
        &[
            ev("Transfer(address,address,uint256)"),
            ev("Approval(address,address,uint256)"),
            ev("ApprovalForAll(address,address,bool)"),
        ],
    ),
    (
        "ERC4494",
        &["permit(address,uint256,uint256,uint8,bytes32,bytes32)"],
        &[],
    ),
    (
        "ERC4524",
        &[
            "safeTransfer(address,uint256)",
            "safeTransfer(address,uint256,bytes)",
            "safeTransferFrom(address,address,uint256)",
            "safeTransferFrom(address,address,uint256,bytes)",
            "onERC20Received(address,address,uint256,bytes)",
        ],
        &[named(
            "Transfer(address,address,uint256)",
            "event Transfer(address indexed from, address indexed to, uint256 value)",
        )],
    ),
    (
        "ERC4675",
        &[
            "transfer(address,uint256,uint256)",
            "approve(address,uint256,uint256)",
            "transferFrom(address,address,uint256,uint256)",
            "setParentNFT(address,uint256,uint256)",
            "totalSupply(uint256)",
            "balanceOf(address,uint256)",
            "allowance(address,address,uint256)",
            "isRegistered(address,uint256)",
            "onERC721Received(address,address,uint256,bytes)",
        ],
        &[
            ev("Transfer(address,address,uint256,uint256)"),
            ev("Approval(address,address,uint256,uint256)"),
            ev("ParentNFTRegistered(address,uint256,uint256)"),
        ],
    ),
];

/// All bundled definitions, in catalog order.
pub fn definitions() -> Vec<StandardDefinition> {
    CATALOG
        .iter()
        .map(|(name, functions, events)| {
            StandardDefinition::register_described(
                *name,
                functions.iter(),
                events.iter().map(|e| {
                    let text = match e.text {
                        Some(text) => text.to_string(),
                        None => format!("event {}", e.signature),
                    };
                    (e.signature.to_string(), text)
                }),
            )
        })
        .collect()
}

/// The bundled catalog as a registry.
pub fn registry() -> Result<SignatureRegistry, RegistryError> {
    SignatureRegistry::build(definitions())
}
