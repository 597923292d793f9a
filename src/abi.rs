//! `sol!` definitions for every external contract surface this crate touches.
//!
//! Field and argument order here must match the deployed ABIs exactly; the
//! encoders are pinned by golden-vector tests in `router::commands`.

use alloy_sol_macro::sol;

sol! {
    /// Pool identification struct as the pool manager ABI declares it.
    #[derive(Debug, PartialEq, Eq)]
    struct SolPoolKey {
        address currency0;
        address currency1;
        uint24 fee;
        int24 tickSpacing;
        address hooks;
    }

    #[sol(rpc)]
    interface IExtsload {
        function extsload(bytes32 slot) external view returns (bytes32);
    }

    interface IUniversalRouter {
        function execute(bytes commands, bytes[] inputs, uint256 deadline) external payable;
    }

    #[sol(rpc)]
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[sol(rpc)]
    interface IAllowanceTransfer {
        function allowance(address owner, address token, address spender)
            external
            view
            returns (uint160 amount, uint48 expiration, uint48 nonce);
        function approve(address token, address spender, uint160 amount, uint48 expiration) external;
    }
}
