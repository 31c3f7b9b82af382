use alloy::sol;

sol! {
    struct McCall {
        address target;
        bytes callData;
    }

    interface IMulticall {
        function getCurrentBlockTimestamp() external view returns (uint256 timestamp);
        function aggregate(McCall[] calldata calls) external view returns (uint256 blockNumber, bytes[] memory returnData);
        function getLastBlockHash() external view returns (bytes32 blockHash);
        function getEthBalance(address addr) external view returns (uint256 balance);
        function getCurrentBlockDifficulty() external view returns (uint256 difficulty);
        function getCurrentBlockGasLimit() external view returns (uint256 gaslimit);
        function getCurrentBlockCoinbase() external view returns (address coinbase);
        function getBlockHash(uint256 blockNumber) external view returns (bytes32 blockHash);
    }
}
